use serde::{Deserialize, Serialize};

/// Local identity record kept in the session slot
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserProfile {
    /// Display name, 1 to 50 characters
    pub username: String,
    /// Job title, 1 to 100 characters
    pub job_title: String,
}

impl UserProfile {
    pub fn new(username: impl Into<String>, job_title: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            job_title: job_title.into(),
        }
    }

    /// Up to two upper-cased initials taken from the first words of the username
    pub fn initials(&self) -> String {
        self.username
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_job_title_in_camel_case() {
        let profile = UserProfile::new("Rick", "Scientist");
        let json = serde_json::to_string(&profile).unwrap();
        assert_eq!(json, r#"{"username":"Rick","jobTitle":"Scientist"}"#);
    }

    #[test]
    fn rejects_unknown_fields() {
        let parsed: Result<UserProfile, _> =
            serde_json::from_str(r#"{"username":"a","jobTitle":"b","admin":true}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn initials_use_first_two_words() {
        assert_eq!(UserProfile::new("rick sanchez c137", "x").initials(), "RS");
        assert_eq!(UserProfile::new("morty", "x").initials(), "M");
        assert_eq!(UserProfile::new("  summer   smith ", "x").initials(), "SS");
    }
}
