use url::form_urlencoded;

pub const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";

const BACKGROUNDS: &[&str] = &[
    "5b21b6", "0f766e", "b45309", "be123c", "1d4ed8", "4d7c0f", "7c2d12", "334155",
];

/// Initials of the first and last name, uppercased; `?` when both are blank.
pub fn initials(first_name: &str, last_name: &str) -> String {
    let mut out = String::new();
    for part in [first_name, last_name] {
        if let Some(ch) = part.trim().chars().next() {
            out.extend(ch.to_uppercase());
        }
    }
    if out.is_empty() {
        out.push('?');
    }
    out
}

/// Initials-based avatar URI. The same names always yield the same URI.
pub fn placeholder_avatar(first_name: &str, last_name: &str) -> String {
    let initials = initials(first_name, last_name);
    let seed = format!("{} {}", first_name.trim(), last_name.trim());
    let background = BACKGROUNDS[(fnv1a(seed.as_bytes()) % BACKGROUNDS.len() as u64) as usize];
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("name", &initials)
        .append_pair("background", background)
        .append_pair("color", "ffffff")
        .finish();
    format!("{AVATAR_BASE_URL}?{query}")
}

pub fn is_placeholder_avatar(uri: &str) -> bool {
    uri.starts_with(AVATAR_BASE_URL)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::{initials, is_placeholder_avatar, placeholder_avatar};

    #[test]
    fn initials_from_both_names() {
        assert_eq!(initials(" amy", "lee "), "AL");
        assert_eq!(initials("Émile", ""), "É");
        assert_eq!(initials("", " "), "?");
    }

    #[test]
    fn placeholder_is_deterministic() {
        let first = placeholder_avatar("Amy", "Lee");
        assert_eq!(first, placeholder_avatar("Amy", "Lee"));
        assert!(first.contains("name=AL"));
        assert!(is_placeholder_avatar(&first));
    }
}
