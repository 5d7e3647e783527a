//! Per-entity row synthesis.
//!
//! Values are random but shape is fixed: every function here turns
//! identifiers minted by earlier pipeline stages into in-memory rows for
//! the next insert, and never talks to the store. All randomness flows
//! through the caller-supplied rng, so a run is reproducible from its seed.

use crate::rows::{
    ClassroomRef, NewAcademicYear, NewClassroom, NewCourse, NewCourseOffering, NewEnrollment,
    NewSchedule, NewStudent, NewTeacher,
};
use crate::sampler::pick_unique;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Utc};
use fake::faker::internet::en::FreeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;

/// Subject catalog seeded as-is, one course row per entry.
pub const COURSE_CATALOG: [(&str, &str); 10] = [
    ("Matemática", "MAT"),
    ("Comunicación", "COM"),
    ("Ciencia y Tecnología", "CST"),
    ("Historia", "HIS"),
    ("Geografía", "GEO"),
    ("Inglés", "ING"),
    ("Educación Física", "EFI"),
    ("Arte", "ART"),
    ("Educación Cívica", "CIV"),
    ("Computación", "INF"),
];

/// Grade levels, crossed with [`SECTIONS`] to form the classroom set.
pub const GRADES: [i16; 5] = [1, 2, 3, 4, 5];
/// Sections per grade.
pub const SECTIONS: [&str; 2] = ["A", "B"];
/// Weekdays a schedule slot may land on.
pub const WEEKDAYS: [&str; 5] = ["MON", "TUE", "WED", "THU", "FRI"];
/// Candidate start hours for schedule slots.
pub const CLASS_START_HOURS: [u32; 4] = [8, 10, 12, 14];
/// Every scheduled block lasts exactly 90 minutes.
pub const CLASS_LENGTH_MINUTES: i64 = 90;
/// Room numbers are drawn from this inclusive range.
pub const ROOM_MIN: i32 = 100;
pub const ROOM_MAX: i32 = 150;
/// Enrollment states drawn uniformly per student.
pub const ENROLLMENT_STATUSES: [&str; 3] = ["active", "withdrawn", "transferred"];
/// Distinct courses (and teachers) offered per classroom.
pub const COURSES_PER_CLASSROOM: usize = 5;
/// Distinct weekdays scheduled per offering.
pub const DAYS_PER_OFFERING: usize = 2;
/// Co-teachers sampled per classroom on top of the homeroom teacher.
pub const CO_TEACHERS_PER_CLASSROOM: usize = 2;
/// Student age bounds, in whole years.
pub const STUDENT_MIN_AGE: i32 = 13;
pub const STUDENT_MAX_AGE: i32 = 17;

/// The single academic year context of a run, opened under `year_label`.
pub fn academic_year(year_label: i32) -> NewAcademicYear {
    NewAcademicYear {
        year_label,
        status: "open".to_string(),
    }
}

/// A fixed-size pool of teachers with independently random contacts.
pub fn teachers<R: Rng>(rng: &mut R, count: usize) -> Vec<NewTeacher> {
    (0..count)
        .map(|_| NewTeacher {
            full_name: Name().fake_with_rng(rng),
            email: FreeEmail().fake_with_rng::<String, _>(rng).to_lowercase(),
            phone: PhoneNumber().fake_with_rng(rng),
        })
        .collect()
}

/// One course row per catalog entry.
pub fn courses() -> Vec<NewCourse> {
    COURSE_CATALOG
        .iter()
        .map(|&(name, code)| NewCourse {
            name: name.to_string(),
            code: code.to_string(),
        })
        .collect()
}

/// A classroom for every (grade, section) combination.
///
/// The teacher set is one draw of `1 + CO_TEACHERS_PER_CLASSROOM` ids
/// without replacement, with the first serving as homeroom teacher, so it
/// always holds `min(3, pool)` distinct members including the homeroom.
/// Yields nothing when the teacher pool is empty.
pub fn classrooms<R: Rng>(
    rng: &mut R,
    academic_year_id: i64,
    teacher_ids: &[i64],
) -> Vec<NewClassroom> {
    let mut rows = Vec::with_capacity(GRADES.len() * SECTIONS.len());
    for &grade_level in &GRADES {
        for &section in &SECTIONS {
            let teacher_set = pick_unique(rng, teacher_ids, 1 + CO_TEACHERS_PER_CLASSROOM);
            let Some(&homeroom) = teacher_set.first() else {
                return rows;
            };
            rows.push(NewClassroom {
                academic_year_id,
                grade_level,
                section: section.to_string(),
                homeroom_teacher_id: homeroom,
                teacher_ids: teacher_set,
            });
        }
    }
    rows
}

/// Up to [`COURSES_PER_CLASSROOM`] offerings per classroom.
///
/// Courses and teachers are sampled without replacement and paired
/// positionally, so no (classroom, course) pair repeats; smaller pools
/// yield fewer offerings.
pub fn course_offerings<R: Rng>(
    rng: &mut R,
    classrooms: &[ClassroomRef],
    course_ids: &[i64],
    teacher_ids: &[i64],
) -> Vec<NewCourseOffering> {
    let mut rows = Vec::with_capacity(classrooms.len() * COURSES_PER_CLASSROOM);
    for classroom in classrooms {
        let picked_courses = pick_unique(rng, course_ids, COURSES_PER_CLASSROOM);
        let picked_teachers = pick_unique(rng, teacher_ids, COURSES_PER_CLASSROOM);
        for (course_id, teacher_id) in picked_courses.into_iter().zip(picked_teachers) {
            rows.push(NewCourseOffering {
                classroom_id: classroom.id,
                course_id,
                teacher_id,
            });
        }
    }
    rows
}

/// [`DAYS_PER_OFFERING`] slots per offering, on distinct weekdays.
///
/// Start hours come from [`CLASS_START_HOURS`]; the end is always the start
/// plus [`CLASS_LENGTH_MINUTES`].
pub fn schedules<R: Rng>(rng: &mut R, offering_ids: &[i64]) -> Vec<NewSchedule> {
    let mut rows = Vec::with_capacity(offering_ids.len() * DAYS_PER_OFFERING);
    for &course_offering_id in offering_ids {
        for day in pick_unique(rng, &WEEKDAYS, DAYS_PER_OFFERING) {
            let hour = *CLASS_START_HOURS.choose(rng).unwrap_or(&CLASS_START_HOURS[0]);
            let starts_at = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
            rows.push(NewSchedule {
                course_offering_id,
                day_of_week: day.to_string(),
                starts_at,
                ends_at: starts_at + Duration::minutes(CLASS_LENGTH_MINUTES),
                room: rng.gen_range(ROOM_MIN..=ROOM_MAX).to_string(),
            });
        }
    }
    rows
}

/// A fixed-size pool of students aged [`STUDENT_MIN_AGE`]–[`STUDENT_MAX_AGE`].
pub fn students<R: Rng>(rng: &mut R, count: usize) -> Vec<NewStudent> {
    (0..count)
        .map(|_| NewStudent {
            full_name: Name().fake_with_rng(rng),
            dni: format!("{:08}", rng.gen_range(0..100_000_000u32)),
            birth_date: birth_date_in_age_range(rng, STUDENT_MIN_AGE, STUDENT_MAX_AGE),
            guardian_name: Name().fake_with_rng(rng),
            guardian_phone: PhoneNumber().fake_with_rng(rng),
        })
        .collect()
}

/// One enrollment per student, in a uniformly chosen classroom.
///
/// The enrollment's `academic_year_id` is copied verbatim from the chosen
/// classroom row, which is what keeps the composite
/// (classroom_id, academic_year_id) reference valid by construction.
pub fn enrollments<R: Rng>(
    rng: &mut R,
    year_label: i32,
    student_ids: &[i64],
    classrooms: &[ClassroomRef],
) -> Vec<NewEnrollment> {
    let (window_start, window_end) = enrollment_window(year_label);
    let mut rows = Vec::with_capacity(student_ids.len());
    for &student_id in student_ids {
        let Some(classroom) = classrooms.choose(rng) else {
            return rows;
        };
        rows.push(NewEnrollment {
            student_id,
            academic_year_id: classroom.academic_year_id,
            classroom_id: classroom.id,
            status: ENROLLMENT_STATUSES
                .choose(rng)
                .copied()
                .unwrap_or("active")
                .to_string(),
            enrolled_at: random_date_between(rng, window_start, window_end),
        });
    }
    rows
}

/// Enrollment window: February 1 through March 31 of the seeded year.
fn enrollment_window(year_label: i32) -> (NaiveDate, NaiveDate) {
    let fallback = Utc::now().date_naive();
    (
        NaiveDate::from_ymd_opt(year_label, 2, 1).unwrap_or(fallback),
        NaiveDate::from_ymd_opt(year_label, 3, 31).unwrap_or(fallback),
    )
}

fn random_date_between<R: Rng>(rng: &mut R, from: NaiveDate, to: NaiveDate) -> NaiveDate {
    let span = (to - from).num_days().max(0);
    from + Duration::days(rng.gen_range(0..=span))
}

/// A birth date for an age uniformly within `[min_age, max_age]` whole
/// years as of today.
fn birth_date_in_age_range<R: Rng>(rng: &mut R, min_age: i32, max_age: i32) -> NaiveDate {
    let today = Utc::now().date_naive();
    let latest = shift_years(today, -min_age);
    let earliest = shift_years(today, -(max_age + 1)) + Duration::days(1);
    random_date_between(rng, earliest, latest)
}

fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    // Feb 29 has no counterpart in non-leap years; fall back to Feb 28.
    date.with_year(date.year() + years)
        .or_else(|| {
            date.pred_opt()
                .and_then(|d| d.with_year(date.year() + years))
        })
        .unwrap_or(date)
}
