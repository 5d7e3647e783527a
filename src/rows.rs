//! Table metadata and typed insert rows.
//!
//! One record type per table, carrying exactly the columns a seeding run
//! supplies. `id`, `created_at` and `updated_at` are assigned by the
//! destination and never appear in insert payloads.

use crate::value::SqlValue;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::fmt;

/// The eight tables touched by a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    AcademicYears,
    Teachers,
    Courses,
    Classrooms,
    CourseOfferings,
    Schedules,
    Students,
    Enrollments,
}

impl Table {
    /// Destination table name.
    pub fn name(self) -> &'static str {
        match self {
            Table::AcademicYears => "academic_years",
            Table::Teachers => "teachers",
            Table::Courses => "courses",
            Table::Classrooms => "classrooms",
            Table::CourseOfferings => "course_offerings",
            Table::Schedules => "schedules",
            Table::Students => "students",
            Table::Enrollments => "enrollments",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Teardown order for the reset stage: children strictly before parents.
pub const RESET_ORDER: [Table; 8] = [
    Table::Enrollments,
    Table::Schedules,
    Table::CourseOfferings,
    Table::Classrooms,
    Table::Courses,
    Table::Students,
    Table::Teachers,
    Table::AcademicYears,
];

/// An insertable row bound for one table.
///
/// `COLUMNS` and [`values`](TableRow::values) stay in lockstep: the nth
/// column name labels the nth value.
pub trait TableRow: Serialize + Send + Sync {
    /// Destination table.
    const TABLE: Table;
    /// Column names of the insert payload, in value order.
    const COLUMNS: &'static [&'static str];

    /// The payload values, in `COLUMNS` order.
    fn values(&self) -> Vec<SqlValue>;
}

/// The single academic year context of a run.
#[derive(Debug, Clone, Serialize)]
pub struct NewAcademicYear {
    pub year_label: i32,
    pub status: String,
}

impl TableRow for NewAcademicYear {
    const TABLE: Table = Table::AcademicYears;
    const COLUMNS: &'static [&'static str] = &["year_label", "status"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Int(self.year_label),
            self.status.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewTeacher {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

impl TableRow for NewTeacher {
    const TABLE: Table = Table::Teachers;
    const COLUMNS: &'static [&'static str] = &["full_name", "email", "phone"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.full_name.clone().into(),
            self.email.clone().into(),
            self.phone.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCourse {
    pub name: String,
    pub code: String,
}

impl TableRow for NewCourse {
    const TABLE: Table = Table::Courses;
    const COLUMNS: &'static [&'static str] = &["name", "code"];

    fn values(&self) -> Vec<SqlValue> {
        vec![self.name.clone().into(), self.code.clone().into()]
    }
}

/// A classroom for one (grade, section) slot of the seeded year.
///
/// Invariant: `homeroom_teacher_id` is a member of `teacher_ids`, and
/// `teacher_ids` holds no duplicates.
#[derive(Debug, Clone, Serialize)]
pub struct NewClassroom {
    pub academic_year_id: i64,
    pub grade_level: i16,
    pub section: String,
    pub homeroom_teacher_id: i64,
    pub teacher_ids: Vec<i64>,
}

impl TableRow for NewClassroom {
    const TABLE: Table = Table::Classrooms;
    const COLUMNS: &'static [&'static str] = &[
        "academic_year_id",
        "grade_level",
        "section",
        "homeroom_teacher_id",
        "teacher_ids",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.academic_year_id.into(),
            SqlValue::SmallInt(self.grade_level),
            self.section.clone().into(),
            self.homeroom_teacher_id.into(),
            SqlValue::BigIntArray(self.teacher_ids.clone()),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCourseOffering {
    pub classroom_id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
}

impl TableRow for NewCourseOffering {
    const TABLE: Table = Table::CourseOfferings;
    const COLUMNS: &'static [&'static str] = &["classroom_id", "course_id", "teacher_id"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.classroom_id.into(),
            self.course_id.into(),
            self.teacher_id.into(),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSchedule {
    pub course_offering_id: i64,
    pub day_of_week: String,
    pub starts_at: NaiveTime,
    pub ends_at: NaiveTime,
    pub room: String,
}

impl TableRow for NewSchedule {
    const TABLE: Table = Table::Schedules;
    const COLUMNS: &'static [&'static str] = &[
        "course_offering_id",
        "day_of_week",
        "starts_at",
        "ends_at",
        "room",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.course_offering_id.into(),
            self.day_of_week.clone().into(),
            SqlValue::Time(self.starts_at),
            SqlValue::Time(self.ends_at),
            self.room.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewStudent {
    pub full_name: String,
    pub dni: String,
    pub birth_date: NaiveDate,
    pub guardian_name: String,
    pub guardian_phone: String,
}

impl TableRow for NewStudent {
    const TABLE: Table = Table::Students;
    const COLUMNS: &'static [&'static str] = &[
        "full_name",
        "dni",
        "birth_date",
        "guardian_name",
        "guardian_phone",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.full_name.clone().into(),
            self.dni.clone().into(),
            SqlValue::Date(self.birth_date),
            self.guardian_name.clone().into(),
            self.guardian_phone.clone().into(),
        ]
    }
}

/// An enrollment tying a student to a classroom of the seeded year.
///
/// The destination validates `(classroom_id, academic_year_id)` as a
/// composite reference into `classrooms`; `academic_year_id` is always
/// copied from the chosen classroom, never derived independently.
#[derive(Debug, Clone, Serialize)]
pub struct NewEnrollment {
    pub student_id: i64,
    pub academic_year_id: i64,
    pub classroom_id: i64,
    pub status: String,
    pub enrolled_at: NaiveDate,
}

impl TableRow for NewEnrollment {
    const TABLE: Table = Table::Enrollments;
    const COLUMNS: &'static [&'static str] = &[
        "student_id",
        "academic_year_id",
        "classroom_id",
        "status",
        "enrolled_at",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.student_id.into(),
            self.academic_year_id.into(),
            self.classroom_id.into(),
            self.status.clone().into(),
            SqlValue::Date(self.enrolled_at),
        ]
    }
}

/// Classroom columns read back for the stages that depend on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassroomRef {
    pub id: i64,
    pub academic_year_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct parent tables of each child in the schema.
    fn parents(table: Table) -> &'static [Table] {
        match table {
            Table::Enrollments => &[Table::Students, Table::Classrooms, Table::AcademicYears],
            Table::Schedules => &[Table::CourseOfferings],
            Table::CourseOfferings => &[Table::Classrooms, Table::Courses, Table::Teachers],
            Table::Classrooms => &[Table::AcademicYears, Table::Teachers],
            _ => &[],
        }
    }

    #[test]
    fn reset_order_deletes_children_before_parents() {
        let position = |t: Table| {
            RESET_ORDER
                .iter()
                .position(|&x| x == t)
                .expect("table missing from reset order")
        };

        for &child in &RESET_ORDER {
            for &parent in parents(child) {
                assert!(
                    position(child) < position(parent),
                    "{child} must be cleared before {parent}"
                );
            }
        }
    }

    #[test]
    fn reset_order_covers_every_table() {
        let all = [
            Table::AcademicYears,
            Table::Teachers,
            Table::Courses,
            Table::Classrooms,
            Table::CourseOfferings,
            Table::Schedules,
            Table::Students,
            Table::Enrollments,
        ];
        for table in all {
            assert!(RESET_ORDER.contains(&table));
        }
    }

    #[test]
    fn columns_and_values_stay_in_lockstep() {
        let classroom = NewClassroom {
            academic_year_id: 1,
            grade_level: 3,
            section: "A".to_string(),
            homeroom_teacher_id: 7,
            teacher_ids: vec![7, 8, 9],
        };
        assert_eq!(NewClassroom::COLUMNS.len(), classroom.values().len());

        let enrollment = NewEnrollment {
            student_id: 1,
            academic_year_id: 1,
            classroom_id: 1,
            status: "active".to_string(),
            enrolled_at: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        };
        assert_eq!(NewEnrollment::COLUMNS.len(), enrollment.values().len());

        let schedule = NewSchedule {
            course_offering_id: 1,
            day_of_week: "MON".to_string(),
            starts_at: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            ends_at: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            room: "101".to_string(),
        };
        assert_eq!(NewSchedule::COLUMNS.len(), schedule.values().len());
    }
}
