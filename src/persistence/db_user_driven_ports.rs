use crate::domain;
use crate::domain::user::{User, UserDetails};
use crate::external_connections::{ConnectionHandle, ExternalConnectivity};
use anyhow::Context;
use sqlx::{query, query_as};

/// Reads users from the `users` table of a configurable schema
pub struct DbUserReader {
    schema: String,
}

impl DbUserReader {
    pub fn new(schema: impl Into<String>) -> Self {
        DbUserReader {
            schema: schema.into(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    fname: String,
    lname: String,
    dob: String,
    email: String,
    phone_no: i64,
}

impl From<UserRow> for User {
    fn from(value: UserRow) -> Self {
        User {
            id: value.id,
            first_name: value.fname,
            last_name: value.lname,
            date_of_birth: value.dob,
            email: value.email,
            phone_number: value.phone_no,
        }
    }
}

impl domain::user::driven_ports::UserReader for DbUserReader {
    async fn get_all(
        &self,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Vec<User>, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!(
            "SELECT id, fname, lname, dob, email, phone_no FROM {}.users ORDER BY id",
            self.schema
        );

        let users = query_as::<_, UserRow>(&statement)
            .fetch_all(cxn.borrow_connection())
            .await
            .context("Fetching all users")?
            .into_iter()
            .map(User::from)
            .collect();

        Ok(users)
    }

    async fn get_by_id(
        &self,
        id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<Option<User>, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!(
            "SELECT id, fname, lname, dob, email, phone_no FROM {}.users WHERE id = $1",
            self.schema
        );

        let user = query_as::<_, UserRow>(&statement)
            .bind(id)
            .fetch_optional(cxn.borrow_connection())
            .await
            .context("Fetching a user by id")?;

        Ok(user.map(User::from))
    }
}

/// Writes users to the `users` table of a configurable schema
pub struct DbUserWriter {
    schema: String,
}

impl DbUserWriter {
    pub fn new(schema: impl Into<String>) -> Self {
        DbUserWriter {
            schema: schema.into(),
        }
    }
}

impl domain::user::driven_ports::UserWriter for DbUserWriter {
    async fn create_user(
        &self,
        user: &UserDetails,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<i32, anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!(
            "INSERT INTO {}.users(fname, lname, dob, email, phone_no) VALUES ($1, $2, $3, $4, $5) RETURNING id",
            self.schema
        );

        let new_id = query_as::<_, super::NewId>(&statement)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.date_of_birth)
            .bind(&user.email)
            .bind(user.phone_number)
            .fetch_one(cxn.borrow_connection())
            .await
            .context("Inserting new user")?;

        Ok(new_id.id)
    }

    async fn update_user(
        &self,
        id: i32,
        user: &UserDetails,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!(
            "UPDATE {}.users SET fname = $1, lname = $2, dob = $3, email = $4, phone_no = $5 WHERE id = $6",
            self.schema
        );

        query(&statement)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.date_of_birth)
            .bind(&user.email)
            .bind(user.phone_number)
            .bind(id)
            .execute(cxn.borrow_connection())
            .await
            .context("Updating a user")?;

        Ok(())
    }

    async fn delete_user(
        &self,
        id: i32,
        ext_cxn: &mut impl ExternalConnectivity,
    ) -> Result<(), anyhow::Error> {
        let mut cxn = ext_cxn.database_cxn().await?;
        let statement = format!("DELETE FROM {}.users WHERE id = $1", self.schema);

        query(&statement)
            .bind(id)
            .execute(cxn.borrow_connection())
            .await
            .context("Deleting a user")?;

        Ok(())
    }
}
