use serde::{Deserialize, Serialize};

use crate::common::aliases::aliased_serde;
use crate::common::string::lenient_string;
use crate::ids::UserId;
use crate::upload::Upload;

/// The signed-in user as returned by `/user-profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub avatar: Option<String>,
}

aliased_serde!(UserProfile {
    "id" = ["ID", "user_id"],
    "username" = ["user_login"],
    "email" = ["user_email"],
});

/// Partial profile update; `None` fields are left untouched on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// New avatar image; forces a multipart request when present
    #[serde(skip)]
    pub avatar: Option<Upload>,
}

impl ProfileUpdate {
    pub fn has_upload(&self) -> bool {
        self.avatar.is_some()
    }

    /// The scalar fields as form pairs, for the multipart variant.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        [
            ("display_name", &self.display_name),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("company", &self.company),
            ("country", &self.country),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_serializes_only_set_fields() {
        let update = ProfileUpdate {
            phone: Some("+886 912 345 678".into()),
            avatar: Some(Upload::new("avatar", "a.png", "image/png", vec![1])),
            ..ProfileUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "phone": "+886 912 345 678" })
        );
        assert!(update.has_upload());
        assert_eq!(update.form_fields().len(), 1);
    }

    #[test]
    fn profile_reads_wordpress_user_shape() {
        let profile: UserProfile = serde_json::from_value(json!({
            "ID": 5,
            "user_login": "acme",
            "user_email": "ops@acme.test",
            "phone": false
        }))
        .unwrap();
        assert_eq!(profile.id, UserId::new(5));
        assert_eq!(profile.username, "acme");
        assert_eq!(profile.phone, None);
    }

    #[test]
    fn profile_tolerates_id_and_user_id_together() {
        let profile: UserProfile = serde_json::from_value(json!({
            "id": 5,
            "user_id": "5",
            "ID": 5,
            "username": "acme",
            "user_login": "acme-legacy",
            "user_email": "ops@acme.test"
        }))
        .unwrap();
        assert_eq!(profile.id, UserId::new(5));
        assert_eq!(profile.username, "acme");
        assert_eq!(profile.email, "ops@acme.test");
    }
}
