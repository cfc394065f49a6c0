//! Pattern-based masking
//!
//! Every mask preserves the character count of its input.

/// Mask the interior of an email's local part
///
/// The first and last character of the local part are kept and everything in
/// between becomes `*`. Local parts of two characters or fewer, and the domain,
/// are left untouched. A value without `@` is treated as a bare local part.
///
/// ```
/// use veil::anonymization::transforms::mask::mask_email;
///
/// assert_eq!(mask_email("john@example.com"), "j**n@example.com");
/// ```
pub fn mask_email(email: &str) -> String {
    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", mask_interior(local), domain),
        None => mask_interior(email),
    }
}

fn mask_interior(local: &str) -> String {
    let chars: Vec<char> = local.chars().collect();
    if chars.len() <= 2 {
        return local.to_string();
    }

    let mut masked = String::with_capacity(local.len());
    masked.push(chars[0]);
    masked.extend(std::iter::repeat('*').take(chars.len() - 2));
    masked.push(chars[chars.len() - 1]);
    masked
}

/// Replace all but the trailing four characters with `*`
///
/// ```
/// use veil::anonymization::transforms::mask::mask_phone;
///
/// assert_eq!(mask_phone("1234567890"), "******7890");
/// ```
pub fn mask_phone(phone: &str) -> String {
    let len = phone.chars().count();
    if len <= 4 {
        return phone.to_string();
    }

    let hidden = len - 4;
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { '*' } else { c })
        .collect()
}

/// Keep the first token of an address and star out the rest
///
/// Tokens are whitespace-delimited and rejoined with single spaces; each
/// masked token keeps its length. Single-token addresses are unchanged.
pub fn mask_address(address: &str) -> String {
    let parts: Vec<&str> = address.split_whitespace().collect();
    if parts.len() <= 1 {
        return address.to_string();
    }

    let mut masked = vec![parts[0].to_string()];
    masked.extend(parts[1..].iter().map(|part| "*".repeat(part.chars().count())));
    masked.join(" ")
}
