//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Registered accounts. `email` is unique and stored lower-cased.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// `applicant` or `admin`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Job applications, each owned by one user.
    jobs (id) {
        id -> Uuid,
        /// Owning user; rows cascade when the user is deleted.
        user_id -> Uuid,
        company -> Varchar,
        title -> Varchar,
        /// One of `Applied`, `Interview`, `Offer`, `Rejected`, `Accepted`.
        status -> Varchar,
        applied_date -> Timestamptz,
        location -> Nullable<Varchar>,
        notes -> Nullable<Varchar>,
        contact_name -> Nullable<Varchar>,
        contact_email -> Nullable<Text>,
        contact_phone -> Nullable<Text>,
        salary -> Nullable<Text>,
        link -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Notifications addressed to a user, optionally about one of their jobs.
    notifications (id) {
        id -> Uuid,
        user_id -> Uuid,
        job_id -> Nullable<Uuid>,
        /// One of `status_change`, `new_job`, `reminder`, `system`.
        kind -> Varchar,
        title -> Text,
        message -> Text,
        read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(jobs -> users (user_id));
diesel::joinable!(notifications -> users (user_id));
diesel::joinable!(notifications -> jobs (job_id));

diesel::allow_tables_to_appear_in_same_query!(users, jobs, notifications);
