//! Internal Diesel row structs for database operations.
//!
//! Implementation details of the persistence layer; never exposed to the
//! domain. Conversions into domain types live next to the rows so the
//! adapters stay free of field-by-field mapping.

use diesel::prelude::*;

use crate::domain::{Course, Group, Professor, Semester, Subject, Tag};

use super::schema::{courses, professors, semesters, study_groups, subjects, tags};

/// Row struct for reading from the subjects table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subjects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubjectRow {
    pub id: i64,
    pub name: String,
}

impl From<SubjectRow> for Subject {
    fn from(row: SubjectRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// Insertable struct for creating subjects.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subjects)]
pub(crate) struct NewSubjectRow<'a> {
    pub name: &'a str,
}

/// Row struct for reading from the semesters table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = semesters)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SemesterRow {
    pub id: i64,
    pub name: String,
}

impl From<SemesterRow> for Semester {
    fn from(row: SemesterRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// Insertable struct for creating semesters.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = semesters)]
pub(crate) struct NewSemesterRow<'a> {
    pub name: &'a str,
}

/// Row struct for reading from the study_groups table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = study_groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GroupRow {
    pub id: i64,
    pub name: String,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

/// Insertable struct for creating study groups.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = study_groups)]
pub(crate) struct NewGroupRow<'a> {
    pub name: &'a str,
}

/// Row struct for reading from the tags table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub label: String,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            label: row.label,
        }
    }
}

/// Insertable struct for creating tags.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub label: &'a str,
}

/// Row struct for reading from the professors table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = professors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfessorRow {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
    pub prohibit_login: bool,
}

impl From<ProfessorRow> for Professor {
    fn from(row: ProfessorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            is_active: row.is_active,
            prohibit_login: row.prohibit_login,
        }
    }
}

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: i64,
    pub professor_id: i64,
    pub subject_id: i64,
    pub semester_id: i64,
    pub group_id: i64,
    pub is_active: bool,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Self {
            id: row.id,
            professor_id: row.professor_id,
            subject_id: row.subject_id,
            semester_id: row.semester_id,
            group_id: row.group_id,
            is_active: row.is_active,
        }
    }
}

/// Insertable struct for creating course enrolments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub(crate) struct NewCourseRow {
    pub professor_id: i64,
    pub subject_id: i64,
    pub semester_id: i64,
    pub group_id: i64,
    pub is_active: bool,
}
