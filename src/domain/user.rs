use crate::external_connections::ExternalConnectivity;
use anyhow::Context;

/// A user as stored in the system
#[derive(PartialEq, Eq, Debug, Clone, Default)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub email: String,
    pub phone_number: i64,
}

/// Every user field except the storage-assigned ID. Used both for creating a user and for
/// overwriting an existing one.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct UserDetails {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub email: String,
    pub phone_number: i64,
}

impl UserDetails {
    /// Attaches an ID to these details, producing a full user
    pub fn into_user(self, id: i32) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            email: self.email,
            phone_number: self.phone_number,
        }
    }
}

pub mod driven_ports {
    use super::*;

    pub trait UserReader: Sync {
        async fn get_all(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Vec<User>, anyhow::Error>;
        async fn get_by_id(
            &self,
            id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<Option<User>, anyhow::Error>;
    }

    pub trait UserWriter: Sync {
        async fn create_user(
            &self,
            user: &UserDetails,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<i32, anyhow::Error>;
        async fn update_user(
            &self,
            id: i32,
            user: &UserDetails,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
        async fn delete_user(
            &self,
            id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
        ) -> Result<(), anyhow::Error>;
    }
}

pub mod driving_ports {
    use super::*;

    pub trait UserPort {
        async fn get_users(
            &self,
            ext_cxn: &mut impl ExternalConnectivity,
            u_reader: &impl driven_ports::UserReader,
        ) -> Result<Vec<User>, anyhow::Error>;
        async fn get_user(
            &self,
            id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_reader: &impl driven_ports::UserReader,
        ) -> Result<Option<User>, anyhow::Error>;
        async fn create_user(
            &self,
            new_user: &UserDetails,
            ext_cxn: &mut impl ExternalConnectivity,
            u_writer: &impl driven_ports::UserWriter,
        ) -> Result<User, anyhow::Error>;
        async fn update_user(
            &self,
            id: i32,
            update: &UserDetails,
            ext_cxn: &mut impl ExternalConnectivity,
            u_writer: &impl driven_ports::UserWriter,
        ) -> Result<User, anyhow::Error>;
        async fn delete_user(
            &self,
            id: i32,
            ext_cxn: &mut impl ExternalConnectivity,
            u_writer: &impl driven_ports::UserWriter,
        ) -> Result<(), anyhow::Error>;
    }
}

pub struct UserService {}

impl driving_ports::UserPort for UserService {
    async fn get_users(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
        u_reader: &impl driven_ports::UserReader,
    ) -> Result<Vec<User>, anyhow::Error> {
        u_reader
            .get_all(&mut *ext_cxn)
            .await
            .context("Failed fetching users")
    }

    async fn get_user(
        &self,
        id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_reader: &impl driven_ports::UserReader,
    ) -> Result<Option<User>, anyhow::Error> {
        u_reader
            .get_by_id(id, &mut *ext_cxn)
            .await
            .with_context(|| format!("Failed fetching user {id}"))
    }

    async fn create_user(
        &self,
        new_user: &UserDetails,
        ext_cxn: &mut impl ExternalConnectivity,
        u_writer: &impl driven_ports::UserWriter,
    ) -> Result<User, anyhow::Error> {
        let new_id = u_writer
            .create_user(new_user, &mut *ext_cxn)
            .await
            .context("Trying to create user at service level")?;

        Ok(new_user.clone().into_user(new_id))
    }

    async fn update_user(
        &self,
        id: i32,
        update: &UserDetails,
        ext_cxn: &mut impl ExternalConnectivity,
        u_writer: &impl driven_ports::UserWriter,
    ) -> Result<User, anyhow::Error> {
        u_writer
            .update_user(id, update, &mut *ext_cxn)
            .await
            .with_context(|| format!("Updating user {id}"))?;

        Ok(update.clone().into_user(id))
    }

    async fn delete_user(
        &self,
        id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
        u_writer: &impl driven_ports::UserWriter,
    ) -> Result<(), anyhow::Error> {
        u_writer
            .delete_user(id, &mut *ext_cxn)
            .await
            .with_context(|| format!("Deleting user {id}"))
    }
}
