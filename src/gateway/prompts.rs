//! Prompt construction for the tutor's three AI tasks

use std::fmt::Write;
use crate::database::Level;
use super::{AnalysisRequest, ChatRequest, QuizRequest};

const NO_LATEX_RULE: &str =
    "Do NOT use LaTeX or dollar-sign math. Write formulas as plain text.";

const QUIZ_BLOCK_RULE: &str = r#"IN-CHAT QUIZ RULE:
If you ask a multiple-choice question during the conversation, END your reply with
exactly this block so the student gets answer buttons:

~~~json
{
  "question": "Short question",
  "options": [
    {"label": "A", "text": "Answer A", "isCorrect": false},
    {"label": "B", "text": "Answer B", "isCorrect": true},
    {"label": "C", "text": "Answer C", "isCorrect": false},
    {"label": "D", "text": "Answer D", "isCorrect": false}
  ]
}
~~~"#;

/// Instruction naming the reply language
pub fn reply_language(language: &str) -> &'static str {
    match language {
        "id" => "Reply in Bahasa Indonesia.",
        _ => "Reply in English.",
    }
}

/// Audience style for a level
pub fn audience_style(level: Level) -> &'static str {
    match level {
        Level::Sd => {
            "AUDIENCE: elementary school child. Style: cheerful and enthusiastic, emoji welcome. \
             Explain with simple stories and comparisons. Never give the answer straight away."
        }
        Level::Smp => {
            "AUDIENCE: junior high student. Style: relaxed mentor. Use analogies from games and hobbies."
        }
        Level::Sma | Level::Mahasiswa => {
            "AUDIENCE: senior high or university student. Style: logical, critical, to the point."
        }
    }
}

/// Difficulty guidance for generated quizzes
pub fn difficulty_note(level: Level) -> &'static str {
    match level {
        Level::Sd => "Questions must be VERY SIMPLE: small numbers and basic vocabulary.",
        Level::Smp => "Questions should match the standard curriculum for this grade.",
        Level::Sma | Level::Mahasiswa => {
            "Questions must be ANALYTICAL, COMPLEX and ADVANCED (higher-order thinking)."
        }
    }
}

/// System instruction for a chat turn
pub fn chat_system_prompt(request: &ChatRequest, language: &str) -> String {
    let role = if request.socratic {
        "ROLE: Socratic tutor. Do NOT give direct answers. Guide the student step by step with questions."
    } else {
        "ROLE: Smart assistant. Answer directly and clearly."
    };
    format!(
        "{}\nTarget: {}\n{}\n{}\n{}\n\n{}",
        role,
        request.level_label,
        audience_style(request.level),
        NO_LATEX_RULE,
        reply_language(language),
        QUIZ_BLOCK_RULE,
    )
}

/// Text of the new user turn, system instruction inlined
pub fn chat_user_turn(request: &ChatRequest, language: &str) -> String {
    format!(
        "[SYSTEM: {}]\n\nUser: {}",
        chat_system_prompt(request, language),
        request.text
    )
}

/// Prompt asking for a multiple-choice quiz as a raw JSON array
pub fn quiz_prompt(request: &QuizRequest, language: &str) -> String {
    format!(
        r#"Role: expert curriculum teacher.
Task: write a multiple-choice quiz.

Student:
- Level: {} (grade {})
- Subject: {}
- Topic: {}
- Difficulty: {}

{}

Output MUST be a JSON array of objects:
[
  {{
    "question": "Question text",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correctIndex": 0,
    "explanation": "Short explanation"
  }}
]

IMPORTANT:
1. "options" MUST be an array of exactly 4 strings, never objects.
2. "correctIndex" is the 0-based index of the correct option.
3. Output raw JSON only, no markdown fences."#,
        request.level,
        request.grade,
        request.subject,
        request.topic,
        difficulty_note(request.level),
        reply_language(language),
    )
}

/// Prompt asking for a narrative progress analysis as a JSON object
pub fn analysis_prompt(request: &AnalysisRequest, language: &str) -> String {
    let mut history = String::new();
    for (i, entry) in request.entries.iter().enumerate() {
        let _ = writeln!(history, "Quiz {}: topic \"{}\", score {}", i + 1, entry.topic, entry.score);
    }
    format!(
        r#"Act as a wise homeroom teacher and academic counsellor.
Analyse this student's performance:

Name: {}
Grade: {}
Subject: {}
Score history:
{}
{}

Answer with a single JSON object and nothing else:
{{
  "strength": "Topics where the student scores high or consistently well",
  "weakness": "Topics where scores are still low",
  "advice": ["Specific study advice to fix the weaknesses"],
  "prediction": "Short prediction of the student's potential from the score trend",
  "motivational_quote": "One short motivational sentence"
}}"#,
        request.student_name,
        request.grade,
        request.subject,
        history.trim_end(),
        reply_language(language),
    )
}
