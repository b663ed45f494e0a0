use anyhow::Context;
use chrono::NaiveDate;

use crate::collection::CollectionView;
use crate::models::{
    Assessment, AssessmentKind, Course, CourseLevel, CourseStatus, Difficulty, Payment,
    PaymentMethod, PaymentStatus, Student, StudentPlan, StudentStatus, Task, TaskKind,
    WorkStatus,
};
use crate::record::Record;

/// Records a page starts with before any import.
pub trait Seeded: Record + Sized {
    fn seed() -> anyhow::Result<Vec<Self>>;
}

pub fn seeded_view<R: Seeded>() -> anyhow::Result<CollectionView<R>> {
    let records = R::seed()?;
    let view = CollectionView::new(records)
        .with_context(|| format!("seed data for {} is inconsistent", R::COLLECTION))?;
    Ok(view)
}

fn day(year: i32, month: u32, day: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .with_context(|| format!("invalid date {year}-{month:02}-{day:02}"))
}

impl Seeded for Student {
    fn seed() -> anyhow::Result<Vec<Self>> {
        let students = vec![
            (
                1,
                "Alice Johnson",
                "alice.johnson@email.com",
                "+1 (555) 123-4567",
                StudentStatus::Active,
                "Advanced Mathematics",
                (85, 1240),
                day(2024, 1, 15)?,
                (12, 89.0, 3),
                StudentPlan::Premium,
            ),
            (
                2,
                "Bob Smith",
                "bob.smith@email.com",
                "+1 (555) 234-5678",
                StudentStatus::Active,
                "Physics Fundamentals",
                (72, 980),
                day(2024, 1, 20)?,
                (8, 76.0, 8),
                StudentPlan::Basic,
            ),
            (
                3,
                "Carol Davis",
                "carol.davis@email.com",
                "+1 (555) 345-6789",
                StudentStatus::Inactive,
                "Chemistry Basics",
                (45, 620),
                day(2024, 2, 1)?,
                (5, 68.0, 15),
                StudentPlan::Basic,
            ),
        ];

        Ok(students
            .into_iter()
            .map(
                |(
                    id,
                    name,
                    email,
                    phone,
                    status,
                    course,
                    (progress, points),
                    join_date,
                    (tests_completed, average_score, rank),
                    plan,
                )| Student {
                    id,
                    name: name.to_string(),
                    email: email.to_string(),
                    phone: phone.to_string(),
                    status,
                    course: course.to_string(),
                    progress,
                    points,
                    join_date,
                    tests_completed,
                    average_score,
                    rank,
                    plan,
                },
            )
            .collect())
    }
}

impl Seeded for Course {
    fn seed() -> anyhow::Result<Vec<Self>> {
        let courses = vec![
            Course {
                id: 1,
                title: "Advanced Mathematics".to_string(),
                description: "Comprehensive course covering calculus, algebra, and statistical analysis"
                    .to_string(),
                instructor: "Dr. Sarah Johnson".to_string(),
                students: 45,
                max_students: 50,
                duration_weeks: 12,
                start_date: day(2024, 2, 1)?,
                end_date: day(2024, 4, 26)?,
                price: 599.0,
                status: CourseStatus::Active,
                category: "Mathematics".to_string(),
                progress: 60,
                total_lessons: 24,
                completed_lessons: 14,
                enrollment_deadline: day(2024, 1, 25)?,
                credits: 3,
                level: CourseLevel::Advanced,
            },
            Course {
                id: 2,
                title: "Physics Fundamentals".to_string(),
                description: "Introduction to classical mechanics, thermodynamics, and electromagnetism"
                    .to_string(),
                instructor: "Prof. Michael Chen".to_string(),
                students: 32,
                max_students: 40,
                duration_weeks: 10,
                start_date: day(2024, 1, 15)?,
                end_date: day(2024, 3, 22)?,
                price: 499.0,
                status: CourseStatus::Active,
                category: "Science".to_string(),
                progress: 75,
                total_lessons: 20,
                completed_lessons: 15,
                enrollment_deadline: day(2024, 1, 10)?,
                credits: 3,
                level: CourseLevel::Intermediate,
            },
            Course {
                id: 3,
                title: "Chemistry Basics".to_string(),
                description: "Essential chemistry concepts including organic and inorganic chemistry"
                    .to_string(),
                instructor: "Dr. Emily Rodriguez".to_string(),
                students: 28,
                max_students: 35,
                duration_weeks: 8,
                start_date: day(2024, 3, 1)?,
                end_date: day(2024, 4, 26)?,
                price: 399.0,
                status: CourseStatus::Upcoming,
                category: "Science".to_string(),
                progress: 0,
                total_lessons: 16,
                completed_lessons: 0,
                enrollment_deadline: day(2024, 2, 25)?,
                credits: 2,
                level: CourseLevel::Beginner,
            },
            Course {
                id: 4,
                title: "English Literature".to_string(),
                description: "Analysis of classic and contemporary literature with writing workshops"
                    .to_string(),
                instructor: "Ms. Amanda Wilson".to_string(),
                students: 22,
                max_students: 30,
                duration_weeks: 14,
                start_date: day(2024, 1, 8)?,
                end_date: day(2024, 4, 12)?,
                price: 449.0,
                status: CourseStatus::Active,
                category: "Literature".to_string(),
                progress: 85,
                total_lessons: 28,
                completed_lessons: 24,
                enrollment_deadline: day(2024, 1, 1)?,
                credits: 4,
                level: CourseLevel::Intermediate,
            },
            Course {
                id: 5,
                title: "Computer Science Intro".to_string(),
                description: "Programming fundamentals with Python and introduction to algorithms"
                    .to_string(),
                instructor: "Dr. James Kim".to_string(),
                students: 38,
                max_students: 45,
                duration_weeks: 16,
                start_date: day(2024, 2, 15)?,
                end_date: day(2024, 6, 7)?,
                price: 699.0,
                status: CourseStatus::Active,
                category: "Technology".to_string(),
                progress: 25,
                total_lessons: 32,
                completed_lessons: 8,
                enrollment_deadline: day(2024, 2, 10)?,
                credits: 4,
                level: CourseLevel::Beginner,
            },
            Course {
                id: 6,
                title: "Art History".to_string(),
                description: "Journey through art movements from Renaissance to contemporary"
                    .to_string(),
                instructor: "Prof. Maria Garcia".to_string(),
                students: 18,
                max_students: 25,
                duration_weeks: 12,
                start_date: day(2023, 11, 1)?,
                end_date: day(2024, 1, 24)?,
                price: 349.0,
                status: CourseStatus::Completed,
                category: "Arts".to_string(),
                progress: 100,
                total_lessons: 24,
                completed_lessons: 24,
                enrollment_deadline: day(2023, 10, 25)?,
                credits: 3,
                level: CourseLevel::Intermediate,
            },
        ];

        Ok(courses)
    }
}

impl Seeded for Assessment {
    fn seed() -> anyhow::Result<Vec<Self>> {
        let tests = vec![
            Assessment {
                id: 1,
                title: "Calculus Midterm Exam".to_string(),
                course: "Advanced Mathematics".to_string(),
                kind: AssessmentKind::Exam,
                questions: 25,
                duration_minutes: 120,
                total_points: 100,
                created_date: day(2024, 1, 15)?,
                due_date: day(2024, 1, 30)?,
                status: WorkStatus::Active,
                submissions: 42,
                total_students: 45,
                average_score: 78.5,
                pass_rate: 85.0,
                difficulty: Difficulty::Hard,
                category: "Mathematics".to_string(),
            },
            Assessment {
                id: 2,
                title: "Physics Lab Quiz #3".to_string(),
                course: "Physics Fundamentals".to_string(),
                kind: AssessmentKind::Quiz,
                questions: 15,
                duration_minutes: 45,
                total_points: 50,
                created_date: day(2024, 1, 20)?,
                due_date: day(2024, 1, 25)?,
                status: WorkStatus::Completed,
                submissions: 32,
                total_students: 32,
                average_score: 41.2,
                pass_rate: 92.0,
                difficulty: Difficulty::Medium,
                category: "Science".to_string(),
            },
            Assessment {
                id: 3,
                title: "Chemistry Assignment #5".to_string(),
                course: "Chemistry Basics".to_string(),
                kind: AssessmentKind::Assignment,
                questions: 10,
                duration_minutes: 60,
                total_points: 75,
                created_date: day(2024, 1, 22)?,
                due_date: day(2024, 2, 5)?,
                status: WorkStatus::Draft,
                submissions: 0,
                total_students: 28,
                average_score: 0.0,
                pass_rate: 0.0,
                difficulty: Difficulty::Easy,
                category: "Science".to_string(),
            },
            Assessment {
                id: 4,
                title: "English Literature Essay".to_string(),
                course: "English Literature".to_string(),
                kind: AssessmentKind::Assignment,
                questions: 3,
                duration_minutes: 180,
                total_points: 100,
                created_date: day(2024, 1, 18)?,
                due_date: day(2024, 1, 28)?,
                status: WorkStatus::Active,
                submissions: 18,
                total_students: 22,
                average_score: 82.3,
                pass_rate: 90.0,
                difficulty: Difficulty::Hard,
                category: "Literature".to_string(),
            },
        ];

        Ok(tests)
    }
}

impl Seeded for Task {
    fn seed() -> anyhow::Result<Vec<Self>> {
        let tasks = vec![
            Task {
                id: 1,
                title: "Python Programming Project".to_string(),
                course: "Computer Science Intro".to_string(),
                kind: TaskKind::Project,
                assigned_date: day(2024, 1, 10)?,
                due_date: day(2024, 2, 15)?,
                status: WorkStatus::Active,
                submissions: 25,
                total_students: 38,
                points: 150,
                difficulty: Difficulty::Hard,
                estimated_hours: 20,
                description: "Create a web application using Python Flask framework".to_string(),
            },
            Task {
                id: 2,
                title: "Art History Presentation".to_string(),
                course: "Art History".to_string(),
                kind: TaskKind::Presentation,
                assigned_date: day(2024, 1, 12)?,
                due_date: day(2024, 1, 26)?,
                status: WorkStatus::Completed,
                submissions: 18,
                total_students: 18,
                points: 100,
                difficulty: Difficulty::Medium,
                estimated_hours: 10,
                description: "Present on a chosen art movement with visual aids".to_string(),
            },
            Task {
                id: 3,
                title: "Math Problem Set #8".to_string(),
                course: "Advanced Mathematics".to_string(),
                kind: TaskKind::Homework,
                assigned_date: day(2024, 1, 25)?,
                due_date: day(2024, 2, 1)?,
                status: WorkStatus::Active,
                submissions: 35,
                total_students: 45,
                points: 50,
                difficulty: Difficulty::Medium,
                estimated_hours: 3,
                description: "Solve calculus problems focusing on derivatives and integrals"
                    .to_string(),
            },
        ];

        Ok(tasks)
    }
}

impl Seeded for Payment {
    fn seed() -> anyhow::Result<Vec<Self>> {
        let payments = vec![
            (
                1,
                "Alice Johnson",
                "alice.johnson@email.com",
                "Advanced Mathematics",
                599.0,
                PaymentMethod::CreditCard,
                PaymentStatus::Completed,
                day(2024, 1, 15)?,
                "TXN001",
            ),
            (
                2,
                "Bob Smith",
                "bob.smith@email.com",
                "Physics Fundamentals",
                499.0,
                PaymentMethod::Paypal,
                PaymentStatus::Completed,
                day(2024, 1, 20)?,
                "TXN002",
            ),
            (
                3,
                "Carol Davis",
                "carol.davis@email.com",
                "Chemistry Basics",
                399.0,
                PaymentMethod::BankTransfer,
                PaymentStatus::Pending,
                day(2024, 1, 25)?,
                "TXN003",
            ),
            (
                4,
                "David Wilson",
                "david.wilson@email.com",
                "English Literature",
                449.0,
                PaymentMethod::Cash,
                PaymentStatus::Completed,
                day(2024, 1, 18)?,
                "TXN004",
            ),
            (
                5,
                "Eva Brown",
                "eva.brown@email.com",
                "Computer Science Intro",
                699.0,
                PaymentMethod::CreditCard,
                PaymentStatus::Failed,
                day(2024, 1, 22)?,
                "TXN005",
            ),
        ];

        Ok(payments
            .into_iter()
            .map(
                |(id, student, email, course, amount, method, status, date, transaction_id)| {
                    Payment {
                        id,
                        student: student.to_string(),
                        email: email.to_string(),
                        course: course.to_string(),
                        amount,
                        method,
                        status,
                        date,
                        transaction_id: transaction_id.to_string(),
                    }
                },
            )
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterState;
    use crate::metric::HeadlineStats;

    #[test]
    fn every_seed_has_unique_ids() {
        assert_eq!(seeded_view::<Student>().expect("students").len(), 3);
        assert_eq!(seeded_view::<Course>().expect("courses").len(), 6);
        assert_eq!(seeded_view::<Assessment>().expect("tests").len(), 4);
        assert_eq!(seeded_view::<Task>().expect("tasks").len(), 3);
        assert_eq!(seeded_view::<Payment>().expect("payments").len(), 5);
    }

    #[test]
    fn payment_headlines_match_seed() {
        let view = seeded_view::<Payment>().expect("payments");
        let stats = view.derive(&Payment::headline_stats(), &FilterState::default());

        assert_eq!(stats.get("Total Revenue"), Some(1547.0));
        assert_eq!(stats.get("Successful Payments"), Some(3.0));
        assert_eq!(stats.get("Pending Payments"), Some(1.0));
        assert_eq!(stats.get("Failed Payments"), Some(1.0));
    }

    #[test]
    fn course_headlines_match_seed() {
        let view = seeded_view::<Course>().expect("courses");
        let stats = view.derive(&Course::headline_stats(), &FilterState::default());

        assert_eq!(stats.get("Total Courses"), Some(6.0));
        assert_eq!(stats.get("Active Courses"), Some(4.0));
        assert_eq!(stats.get("Total Students"), Some(183.0));
        let revenue = 599.0 * 45.0 + 499.0 * 32.0 + 399.0 * 28.0 + 449.0 * 22.0 + 699.0 * 38.0
            + 349.0 * 18.0;
        assert_eq!(stats.get("Total Revenue"), Some(revenue));
    }

    #[test]
    fn test_average_score_counts_drafts() {
        let view = seeded_view::<Assessment>().expect("tests");
        let stats = view.derive(&Assessment::headline_stats(), &FilterState::default());
        let average = stats.get("Avg. Score").expect("avg score");
        assert!((average - (78.5 + 41.2 + 0.0 + 82.3) / 4.0).abs() < 0.001);
    }
}
