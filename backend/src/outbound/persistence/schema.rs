//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions are maintained by hand and must match the deployed
//! database exactly; Diesel uses them for compile-time query validation.
//! Update them whenever the externally applied DDL changes the layout.

diesel::table! {
    /// Subjects catalogue.
    subjects (id) {
        /// Primary key.
        id -> Int8,
        /// Unique display name.
        name -> Varchar,
    }
}

diesel::table! {
    /// Semesters catalogue.
    semesters (id) {
        /// Primary key.
        id -> Int8,
        /// Unique display name.
        name -> Varchar,
    }
}

diesel::table! {
    /// Study groups catalogue.
    study_groups (id) {
        /// Primary key.
        id -> Int8,
        /// Unique display name.
        name -> Varchar,
    }
}

diesel::table! {
    /// Repository tags.
    tags (id) {
        /// Primary key.
        id -> Int8,
        /// Unique label text.
        label -> Varchar,
    }
}

diesel::table! {
    /// The professor slice of the platform's account table.
    professors (id) {
        /// Primary key.
        id -> Int8,
        /// Display name.
        name -> Varchar,
        /// Account has been approved.
        is_active -> Bool,
        /// Account is still waiting for approval.
        prohibit_login -> Bool,
    }
}

diesel::table! {
    /// Course enrolments; the four foreign keys form a unique tuple.
    courses (id) {
        /// Primary key.
        id -> Int8,
        /// Owning professor.
        professor_id -> Int8,
        /// Subject taught.
        subject_id -> Int8,
        /// Semester in which it is taught.
        semester_id -> Int8,
        /// Study group taught.
        group_id -> Int8,
        /// Whether the enrolment is currently taught.
        is_active -> Bool,
    }
}

diesel::table! {
    /// Join table linking host-platform repositories to tags.
    repo_tags (repo_id, tag_id) {
        /// Repository id in the host platform.
        repo_id -> Int8,
        /// Tagged with.
        tag_id -> Int8,
    }
}

diesel::joinable!(courses -> subjects (subject_id));
diesel::joinable!(courses -> semesters (semester_id));
diesel::joinable!(courses -> study_groups (group_id));
diesel::joinable!(courses -> professors (professor_id));
diesel::joinable!(repo_tags -> tags (tag_id));

diesel::allow_tables_to_appear_in_same_query!(
    subjects,
    semesters,
    study_groups,
    tags,
    professors,
    courses,
    repo_tags,
);
