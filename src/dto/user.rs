use crate::domain;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// DTO for a stored user
#[derive(Serialize, ToSchema)]
#[cfg_attr(test, derive(Deserialize, PartialEq, Eq, Debug))]
pub struct User {
    #[schema(example = 1)]
    pub id: i32,
    #[serde(rename = "fname")]
    #[schema(example = "Amy")]
    pub first_name: String,
    #[serde(rename = "lname")]
    #[schema(example = "Lee")]
    pub last_name: String,
    #[serde(rename = "dob")]
    #[schema(example = "1990-01-01")]
    pub date_of_birth: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[serde(rename = "phoneno")]
    #[schema(example = 5551234)]
    pub phone_number: i64,
}

impl From<domain::user::User> for User {
    fn from(value: domain::user::User) -> Self {
        User {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            date_of_birth: value.date_of_birth,
            email: value.email,
            phone_number: value.phone_number,
        }
    }
}

/// DTO for creating or overwriting a user. An `id` field in the body is ignored.
#[derive(Deserialize, ToSchema)]
#[cfg_attr(test, derive(Serialize, Debug, Clone))]
pub struct UserDetails {
    #[serde(rename = "fname")]
    #[schema(example = "Amy")]
    pub first_name: String,
    #[serde(rename = "lname")]
    #[schema(example = "Lee")]
    pub last_name: String,
    #[serde(rename = "dob")]
    #[schema(example = "1990-01-01")]
    pub date_of_birth: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[serde(rename = "phoneno")]
    #[schema(example = 5551234)]
    pub phone_number: i64,
}

impl From<UserDetails> for domain::user::UserDetails {
    fn from(value: UserDetails) -> Self {
        domain::user::UserDetails {
            first_name: value.first_name,
            last_name: value.last_name,
            date_of_birth: value.date_of_birth,
            email: value.email,
            phone_number: value.phone_number,
        }
    }
}
