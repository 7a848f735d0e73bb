//! Shared utility functions for medstore-server

pub fn hash_password(password: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Build a URL slug from a product name: lowercase, non-alphanumeric runs
/// collapsed to single hyphens, no leading/trailing hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Slug with a timestamp suffix so concurrent creates with the same name
/// cannot collide on the unique constraint.
pub fn unique_slug(name: &str) -> String {
    let base = slugify(name);
    let suffix = chrono::Utc::now().timestamp_millis();
    if base.is_empty() {
        format!("product-{suffix}")
    } else {
        format!("{base}-{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("admin123").unwrap();
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_verify_password_bad_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Pro Endoscope HD"), "pro-endoscope-hd");
        assert_eq!(slugify("  X-Ray  (Digital) "), "x-ray-digital");
        assert_eq!(slugify("Überscope"), "berscope");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_unique_slug_has_base_and_suffix() {
        let slug = unique_slug("Surgical Forceps Set");
        assert!(slug.starts_with("surgical-forceps-set-"));
        let slug = unique_slug("!!!");
        assert!(slug.starts_with("product-"));
    }
}
