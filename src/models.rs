use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::filter::StatusFilter;
use crate::metric::{HeadlineStats, Metric, Stat};
use crate::record::{Field, Record, Status, Tag};

macro_rules! tags {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl Tag for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Active,
    Inactive,
    Suspended,
}

tags!(StudentStatus {
    Active => "active",
    Inactive => "inactive",
    Suspended => "suspended",
});
impl Status for StudentStatus {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentPlan {
    Basic,
    Premium,
    Enterprise,
}

tags!(StudentPlan {
    Basic => "basic",
    Premium => "premium",
    Enterprise => "enterprise",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StudentField {
    Progress,
    Points,
    TestsCompleted,
    AverageScore,
}

tags!(StudentField {
    Progress => "progress",
    Points => "points",
    TestsCompleted => "tests_completed",
    AverageScore => "average_score",
});
impl Field for StudentField {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: StudentStatus,
    pub course: String,
    pub progress: u32,
    pub points: u32,
    pub join_date: NaiveDate,
    pub tests_completed: u32,
    pub average_score: f64,
    pub rank: u32,
    pub plan: StudentPlan,
}

impl Record for Student {
    type Id = u32;
    type Status = StudentStatus;
    type Field = StudentField;

    const ENTITY: &'static str = "student";
    const COLLECTION: &'static str = "students";

    fn id(&self) -> &u32 {
        &self.id
    }

    fn status(&self) -> StudentStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str(), self.course.as_str()]
    }

    fn value(&self, field: StudentField) -> f64 {
        match field {
            StudentField::Progress => self.progress as f64,
            StudentField::Points => self.points as f64,
            StudentField::TestsCompleted => self.tests_completed as f64,
            StudentField::AverageScore => self.average_score,
        }
    }
}

impl HeadlineStats for Student {
    fn headline_stats() -> Vec<Stat<StudentStatus, StudentField>> {
        vec![
            Stat::collection("Total Students", Metric::Count),
            Stat::collection("Active Students", Metric::CountWhere(StudentStatus::Active)),
            Stat::collection("Total Points", Metric::Sum(StudentField::Points)),
            Stat::collection("Avg. Progress", Metric::Average(StudentField::Progress)),
        ]
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} <{}> [{}] {} - progress {}%, {} pts, avg score {:.1}, {} plan",
            self.id,
            self.name,
            self.email,
            self.status,
            self.course,
            self.progress,
            self.points,
            self.average_score,
            self.plan
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    Active,
    Upcoming,
    Completed,
    Paused,
}

tags!(CourseStatus {
    Active => "active",
    Upcoming => "upcoming",
    Completed => "completed",
    Paused => "paused",
});
impl Status for CourseStatus {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

tags!(CourseLevel {
    Beginner => "beginner",
    Intermediate => "intermediate",
    Advanced => "advanced",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourseField {
    Students,
    MaxStudents,
    Price,
    /// Price multiplied by enrolled students.
    Revenue,
    Progress,
    Credits,
}

tags!(CourseField {
    Students => "students",
    MaxStudents => "max_students",
    Price => "price",
    Revenue => "revenue",
    Progress => "progress",
    Credits => "credits",
});
impl Field for CourseField {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub students: u32,
    pub max_students: u32,
    pub duration_weeks: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
    pub status: CourseStatus,
    pub category: String,
    pub progress: u32,
    pub total_lessons: u32,
    pub completed_lessons: u32,
    pub enrollment_deadline: NaiveDate,
    pub credits: u32,
    pub level: CourseLevel,
}

impl Course {
    pub fn seats_left(&self) -> u32 {
        self.max_students.saturating_sub(self.students)
    }
}

impl Record for Course {
    type Id = u32;
    type Status = CourseStatus;
    type Field = CourseField;

    const ENTITY: &'static str = "course";
    const COLLECTION: &'static str = "courses";

    fn id(&self) -> &u32 {
        &self.id
    }

    fn status(&self) -> CourseStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str(), self.category.as_str()]
    }

    fn value(&self, field: CourseField) -> f64 {
        match field {
            CourseField::Students => self.students as f64,
            CourseField::MaxStudents => self.max_students as f64,
            CourseField::Price => self.price,
            CourseField::Revenue => self.price * self.students as f64,
            CourseField::Progress => self.progress as f64,
            CourseField::Credits => self.credits as f64,
        }
    }
}

impl HeadlineStats for Course {
    fn headline_stats() -> Vec<Stat<CourseStatus, CourseField>> {
        vec![
            Stat::collection("Total Courses", Metric::Count),
            Stat::collection("Active Courses", Metric::CountWhere(CourseStatus::Active)),
            Stat::collection("Total Students", Metric::Sum(CourseField::Students)),
            Stat::collection("Total Revenue", Metric::Sum(CourseField::Revenue)),
        ]
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({}, {}) [{}] {} - {}/{} students, ${:.0}, {} weeks from {}",
            self.id,
            self.title,
            self.category,
            self.level,
            self.status,
            self.instructor,
            self.students,
            self.max_students,
            self.price,
            self.duration_weeks,
            self.start_date
        )
    }
}

/// Lifecycle shared by tests and tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    Active,
    Completed,
    Draft,
    Overdue,
}

tags!(WorkStatus {
    Active => "active",
    Completed => "completed",
    Draft => "draft",
    Overdue => "overdue",
});
impl Status for WorkStatus {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

tags!(Difficulty {
    Easy => "easy",
    Medium => "medium",
    Hard => "hard",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentKind {
    Exam,
    Quiz,
    Assignment,
}

tags!(AssessmentKind {
    Exam => "exam",
    Quiz => "quiz",
    Assignment => "assignment",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssessmentField {
    Questions,
    Duration,
    TotalPoints,
    Submissions,
    AverageScore,
    PassRate,
}

tags!(AssessmentField {
    Questions => "questions",
    Duration => "duration",
    TotalPoints => "total_points",
    Submissions => "submissions",
    AverageScore => "average_score",
    PassRate => "pass_rate",
});
impl Field for AssessmentField {}

/// A test, quiz or graded assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: u32,
    pub title: String,
    pub course: String,
    pub kind: AssessmentKind,
    pub questions: u32,
    pub duration_minutes: u32,
    pub total_points: u32,
    pub created_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: WorkStatus,
    pub submissions: u32,
    pub total_students: u32,
    pub average_score: f64,
    pub pass_rate: f64,
    pub difficulty: Difficulty,
    pub category: String,
}

impl Record for Assessment {
    type Id = u32;
    type Status = WorkStatus;
    type Field = AssessmentField;

    const ENTITY: &'static str = "test";
    const COLLECTION: &'static str = "tests";

    fn id(&self) -> &u32 {
        &self.id
    }

    fn status(&self) -> WorkStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.course.as_str()]
    }

    fn value(&self, field: AssessmentField) -> f64 {
        match field {
            AssessmentField::Questions => self.questions as f64,
            AssessmentField::Duration => self.duration_minutes as f64,
            AssessmentField::TotalPoints => self.total_points as f64,
            AssessmentField::Submissions => self.submissions as f64,
            AssessmentField::AverageScore => self.average_score,
            AssessmentField::PassRate => self.pass_rate,
        }
    }
}

impl HeadlineStats for Assessment {
    fn headline_stats() -> Vec<Stat<WorkStatus, AssessmentField>> {
        vec![
            Stat::collection("Total Tests", Metric::Count),
            Stat::collection("Active Tests", Metric::CountWhere(WorkStatus::Active)),
            Stat::collection("Avg. Score", Metric::Average(AssessmentField::AverageScore)),
        ]
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({} {}, {}) [{}] due {} - {}/{} submitted, avg {:.1}, pass rate {:.0}%",
            self.id,
            self.title,
            self.difficulty,
            self.kind,
            self.course,
            self.status,
            self.due_date,
            self.submissions,
            self.total_students,
            self.average_score,
            self.pass_rate
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Project,
    Presentation,
    Homework,
}

tags!(TaskKind {
    Project => "project",
    Presentation => "presentation",
    Homework => "homework",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Points,
    Submissions,
    TotalStudents,
}

tags!(TaskField {
    Points => "points",
    Submissions => "submissions",
    TotalStudents => "total_students",
});
impl Field for TaskField {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub course: String,
    pub kind: TaskKind,
    pub assigned_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: WorkStatus,
    pub submissions: u32,
    pub total_students: u32,
    pub points: u32,
    pub difficulty: Difficulty,
    pub estimated_hours: u32,
    pub description: String,
}

impl Record for Task {
    type Id = u32;
    type Status = WorkStatus;
    type Field = TaskField;

    const ENTITY: &'static str = "task";
    const COLLECTION: &'static str = "tasks";

    fn id(&self) -> &u32 {
        &self.id
    }

    fn status(&self) -> WorkStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.course.as_str()]
    }

    fn value(&self, field: TaskField) -> f64 {
        match field {
            TaskField::Points => self.points as f64,
            TaskField::Submissions => self.submissions as f64,
            TaskField::TotalStudents => self.total_students as f64,
        }
    }
}

impl HeadlineStats for Task {
    fn headline_stats() -> Vec<Stat<WorkStatus, TaskField>> {
        vec![
            Stat::collection("Total Tasks", Metric::Count),
            Stat::collection("Active Tasks", Metric::CountWhere(WorkStatus::Active)),
            Stat::collection("Total Points", Metric::Sum(TaskField::Points)),
        ]
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} ({} {}, {}) [{}] due {} - {}/{} submitted, {} pts, ~{}h",
            self.id,
            self.title,
            self.difficulty,
            self.kind,
            self.course,
            self.status,
            self.due_date,
            self.submissions,
            self.total_students,
            self.points,
            self.estimated_hours
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
    Refunded,
}

tags!(PaymentStatus {
    Completed => "completed",
    Pending => "pending",
    Failed => "failed",
    Refunded => "refunded",
});
impl Status for PaymentStatus {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    BankTransfer,
    Cash,
}

tags!(PaymentMethod {
    CreditCard => "credit_card",
    Paypal => "paypal",
    BankTransfer => "bank_transfer",
    Cash => "cash",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentField {
    Amount,
}

tags!(PaymentField {
    Amount => "amount",
});
impl Field for PaymentField {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: u32,
    pub student: String,
    pub email: String,
    pub course: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub date: NaiveDate,
    pub transaction_id: String,
}

impl Record for Payment {
    type Id = u32;
    type Status = PaymentStatus;
    type Field = PaymentField;

    const ENTITY: &'static str = "payment";
    const COLLECTION: &'static str = "payments";

    fn id(&self) -> &u32 {
        &self.id
    }

    fn status(&self) -> PaymentStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.student.as_str(), self.course.as_str(), self.transaction_id.as_str()]
    }

    fn value(&self, field: PaymentField) -> f64 {
        match field {
            PaymentField::Amount => self.amount,
        }
    }
}

impl HeadlineStats for Payment {
    fn headline_stats() -> Vec<Stat<PaymentStatus, PaymentField>> {
        vec![
            Stat::collection(
                "Total Revenue",
                Metric::SumWhere(
                    PaymentField::Amount,
                    StatusFilter::Only(PaymentStatus::Completed),
                ),
            ),
            Stat::collection(
                "Successful Payments",
                Metric::CountWhere(PaymentStatus::Completed),
            ),
            Stat::collection("Pending Payments", Metric::CountWhere(PaymentStatus::Pending)),
            Stat::collection("Failed Payments", Metric::CountWhere(PaymentStatus::Failed)),
        ]
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} ({}) [{}] ${:.2} via {} on {}",
            self.id,
            self.transaction_id,
            self.student,
            self.course,
            self.status,
            self.amount,
            self.method,
            self.date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seeded;

    #[test]
    fn course_revenue_is_price_times_enrollment() {
        let courses = Course::seed().expect("seed courses");
        let maths = &courses[0];
        assert!((maths.value(CourseField::Revenue) - 599.0 * 45.0).abs() < 0.001);
        assert_eq!(maths.seats_left(), 5);
    }

    #[test]
    fn payments_search_transaction_id() {
        let payments = Payment::seed().expect("seed payments");
        assert!(payments[2].search_fields().contains(&"TXN003"));
    }

    #[test]
    fn statuses_serialize_as_snake_case() {
        let json = serde_json::to_string(&PaymentMethod::BankTransfer).expect("serialize");
        assert_eq!(json, "\"bank_transfer\"");
        assert_eq!(PaymentMethod::BankTransfer.to_string(), "bank_transfer");
    }

    #[test]
    fn tests_and_tasks_share_statuses() {
        assert_eq!(
            WorkStatus::names(),
            vec!["active", "completed", "draft", "overdue"]
        );
        assert_eq!(CourseStatus::parse("Paused"), Some(CourseStatus::Paused));
    }
}
