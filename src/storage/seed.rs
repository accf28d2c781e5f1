use crate::error::Result;
use crate::models::{
    candidate::Candidate,
    question::{AnswerValue, Question, QuestionType},
    test::Test,
    user::{User, UserRole},
};
use crate::storage::DataStore;
use crate::utils::time::now;

/// Fills empty documents with a small demo question bank, one test and two candidates.
pub async fn seed_demo_data(store: &DataStore) -> Result<()> {
    let questions = demo_questions();
    let total_points = questions.iter().map(|q| q.points).sum();
    let question_ids = questions.iter().map(|q| q.id.clone()).collect();

    if store.questions.seed_if_empty(questions).await? {
        tracing::info!("Seeded demo questions");
    }

    let ts = now();
    let tests = vec![Test {
        id: "t1".into(),
        title: "JavaScript Fundamentals".into(),
        description: "Basic JavaScript knowledge assessment".into(),
        question_ids,
        time_limit_minutes: 30,
        total_points,
        is_active: true,
        created_at: ts,
        updated_at: ts,
    }];
    if store.tests.seed_if_empty(tests).await? {
        tracing::info!("Seeded demo test");
    }

    let candidates = vec![
        Candidate {
            id: "c1".into(),
            name: "John Doe".into(),
            email: "john.doe@example.com".into(),
            assigned_tests: vec!["t1".into()],
            created_at: ts,
        },
        Candidate {
            id: "c2".into(),
            name: "Jane Smith".into(),
            email: "jane.smith@example.com".into(),
            assigned_tests: vec!["t1".into()],
            created_at: ts,
        },
    ];
    if store.candidates.seed_if_empty(candidates).await? {
        tracing::info!("Seeded demo candidates");
    }

    let users = vec![
        User {
            id: "u1".into(),
            name: "Assessments Manager".into(),
            email: "assessments@company.com".into(),
            role: UserRole::Assessments,
            created_at: ts,
        },
        User {
            id: "u2".into(),
            name: "John Doe".into(),
            email: "john.doe@example.com".into(),
            role: UserRole::TakeAssessment,
            created_at: ts,
        },
    ];
    if store.users.seed_if_empty(users).await? {
        tracing::info!("Seeded demo users");
    }

    Ok(())
}

fn demo_questions() -> Vec<Question> {
    let ts = now();
    let base = |id: &str, question_type: QuestionType, title: &str, prompt: &str, points: u32| {
        Question {
            id: id.into(),
            question_type,
            title: title.into(),
            prompt: prompt.into(),
            options: None,
            expected_answer: None,
            code_template: None,
            language: None,
            points,
            time_limit_seconds: None,
            created_at: ts,
            updated_at: ts,
        }
    };

    let mut q1 = base(
        "q1",
        QuestionType::SingleChoice,
        "What is JavaScript?",
        "Choose the best description of JavaScript:",
        10,
    );
    q1.options = Some(vec![
        "A programming language for web development".into(),
        "A database management system".into(),
        "An operating system".into(),
        "A web browser".into(),
    ]);
    q1.expected_answer = Some("A programming language for web development".into());

    let mut q2 = base(
        "q2",
        QuestionType::FillBlank,
        "Complete the sentence",
        "React is a _____ library for building user interfaces.",
        5,
    );
    q2.expected_answer = Some("JavaScript".into());

    let mut q3 = base(
        "q3",
        QuestionType::Code,
        "Write a function to add two numbers",
        "Create a function that takes two numbers as parameters and returns their sum.",
        15,
    );
    q3.code_template = Some("function add(a, b) {\n  // Your code here\n}".into());
    q3.language = Some("javascript".into());
    q3.expected_answer = Some("return a + b".into());

    let mut q4 = base(
        "q4",
        QuestionType::OrderedList,
        "Arrange the steps in order",
        "First step|Second step|Third step|Fourth step",
        10,
    );
    q4.expected_answer = Some(AnswerValue::List(vec![
        "First step".into(),
        "Second step".into(),
        "Third step".into(),
        "Fourth step".into(),
    ]));

    let q5 = base(
        "q5",
        QuestionType::ShortText,
        "Explain the concept of variables",
        "In your own words, explain what variables are in programming and why they are useful.",
        8,
    );

    vec![q1, q2, q3, q4, q5]
}
