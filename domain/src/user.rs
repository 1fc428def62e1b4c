//! The authenticated user as the backend reports it.

use serde::{Deserialize, Serialize};

/// Account data mirrored from the backend's user object. The client never
/// owns this; it is a cache of the last `auth/me` or login answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    /// Subscription tier name (e.g. "free", "pro").
    pub plan: String,
    #[serde(rename = "isYearly", default)]
    pub is_yearly: bool,
    #[serde(rename = "isSubscriber", default)]
    pub is_subscriber: bool,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields required to create an account.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterParams {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_deserializes_backend_shape() {
        let user: User = serde_json::from_str(
            r#"{
                "_id": "665f1a",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "plan": "pro",
                "isYearly": true,
                "isSubscriber": true
            }"#,
        )
        .unwrap();
        assert_eq!(user.id, "665f1a");
        assert_eq!(user.display_name(), "Ada Lovelace");
        assert!(user.is_subscriber);
    }

    #[test]
    fn test_subscription_flags_default_to_false() {
        let user: User = serde_json::from_str(
            r#"{
                "_id": "1",
                "firstName": "A",
                "lastName": "B",
                "email": "a@b.c",
                "plan": "free"
            }"#,
        )
        .unwrap();
        assert!(!user.is_subscriber);
        assert!(!user.is_yearly);
    }

    #[test]
    fn test_register_params_serialize_camel_case() {
        let params = RegisterParams {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["lastName"], "Lovelace");
    }
}
