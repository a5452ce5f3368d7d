//! Prompt builders and response parsers for the Gemini source.
//!
//! The API returns free-form text, so parsing has an explicit
//! partial-failure contract: `parse_questions` returns whatever parsed
//! (possibly nothing) and `extract_json_block` returns `None` when no
//! JSON can be located. Neither ever panics on malformed input.

use regex::Regex;

use crate::session::model::{Question, SetupData};

/// Upper bound on questions parsed out of a generation response.
pub const MAX_PARSED_QUESTIONS: usize = 5;

/// Placeholder paired with a skipped question in the analysis prompt.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response provided.";

/// Build the question-generation prompt from a submitted setup.
pub fn question_generation_prompt(setup: &SetupData) -> String {
    format!(
        "Act as an experienced interviewer for a {position} position at {company}.\n\
         Generate 5 realistic {kind} interview questions based on the following:\n\
         \n\
         Job Description:\n\
         {job_description}\n\
         \n\
         Key Skills:\n\
         {skills}\n\
         \n\
         The questions should be challenging but fair. For each question, also provide the \
         category it belongs to (e.g., Problem Solving, Technical Skills, Leadership, etc.).\n\
         \n\
         Format your response as follows:\n\
         \n\
         1. [Question]\n\
         Category: [Category]\n\
         \n\
         2. [Question]\n\
         Category: [Category]\n\
         \n\
         And so on...",
        position = setup.position_title,
        company = setup.company,
        kind = setup.interview_type,
        job_description = setup.job_description,
        skills = setup.skills.join(", "),
    )
}

/// Build the feedback-analysis prompt: each question (with category)
/// paired with its answer, skipped slots marked with
/// [`NO_RESPONSE_PLACEHOLDER`].
pub fn feedback_analysis_prompt(
    questions: &[Question],
    answers: &[Option<String>],
    setup: &SetupData,
) -> String {
    let questions_and_answers = questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let answer = answers
                .get(i)
                .and_then(|a| a.as_deref())
                .unwrap_or(NO_RESPONSE_PLACEHOLDER);
            format!(
                "Question ({category}): {question}\nAnswer: {answer}",
                category = q.category,
                question = q.question,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Act as an expert interview coach analyzing responses for a {position} position.\n\
         \n\
         Candidate is interviewing for: {position} at {company}\n\
         \n\
         Review the following interview questions and answers:\n\
         \n\
         {questions_and_answers}\n\
         \n\
         Provide a comprehensive analysis including:\n\
         1. Overall score from 0-100\n\
         2. Specific metrics (Clarity, Relevance, Structure, Examples) scored from 0-100\n\
         3. Key strengths (at least 3)\n\
         4. Areas for improvement (at least 3)\n\
         5. A brief summary of overall performance\n\
         \n\
         Format your response as a JSON object like this:\n\
         \n\
         ```json\n\
         {{\n\
           \"overallScore\": 80,\n\
           \"metrics\": [\n\
             {{\"name\": \"Clarity\", \"score\": 85, \"description\": \"How clearly you articulated your thoughts\"}},\n\
             {{\"name\": \"Relevance\", \"score\": 75, \"description\": \"How well your answers addressed the questions\"}}\n\
           ],\n\
           \"strengths\": [\"Strength 1\", \"Strength 2\", \"Strength 3\"],\n\
           \"improvements\": [\"Improvement 1\", \"Improvement 2\", \"Improvement 3\"],\n\
           \"summary\": \"Overall summary of performance and key recommendations\"\n\
         }}\n\
         ```",
        position = setup.position_title,
        company = setup.company,
    )
}

/// Parse questions out of a free-form numbered-list response.
///
/// Splits on `1. `, `2. `, ... item markers, extracts a `Category: <label>`
/// marker per item (defaulting to `General`), and truncates to
/// [`MAX_PARSED_QUESTIONS`]. Returns an empty vec when nothing parses;
/// the caller decides whether that is an error.
pub fn parse_questions(text: &str) -> Vec<Question> {
    let item_marker = Regex::new(r"(?m)^\s*\d+\.\s+").unwrap();
    let category_marker = Regex::new(r"(?i)Category:\s*([\w ]+)").unwrap();

    // Anything before the first item marker is preamble, not a question.
    let Some(first) = item_marker.find(text) else {
        return Vec::new();
    };

    item_marker
        .split(&text[first.start()..])
        .filter_map(|section| {
            let category = category_marker
                .captures(section)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_else(|| "General".to_string());

            let question = category_marker.replace(section, "").trim().to_string();
            if question.is_empty() {
                None
            } else {
                Some(Question { question, category })
            }
        })
        .take(MAX_PARSED_QUESTIONS)
        .collect()
}

/// Locate a JSON object in a free-form response.
///
/// Accepts a ```json fenced block, a bare ``` fenced block, or the
/// outermost brace pair. Returns the candidate slice without validating
/// it; the caller's deserializer is the judge.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let fenced = Regex::new(r"(?s)```(?:json)?\s*\n(.*?)\n\s*```").unwrap();
    if let Some(captures) = fenced.captures(text) {
        return captures.get(1).map(|m| m.as_str());
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::model::InterviewKind;

    fn setup() -> SetupData {
        SetupData {
            interview_type: InterviewKind::Behavioral,
            position_title: "Engineer".to_string(),
            company: "Acme".to_string(),
            job_description: "Build and ship backend services.".to_string(),
            skills: vec!["Rust".to_string(), "Leadership".to_string()],
            resume_path: None,
        }
    }

    #[test]
    fn generation_prompt_embeds_setup_fields() {
        let prompt = question_generation_prompt(&setup());
        assert!(prompt.contains("Engineer position at Acme"));
        assert!(prompt.contains("behavioral interview questions"));
        assert!(prompt.contains("Build and ship backend services."));
        assert!(prompt.contains("Rust, Leadership"));
        assert!(prompt.contains("Category: [Category]"));
    }

    #[test]
    fn analysis_prompt_pairs_questions_with_answers() {
        let questions = vec![
            Question::new("Why us?", "Motivation"),
            Question::new("Tell me about a failure.", "Growth"),
        ];
        let answers = vec![Some("Because.".to_string()), None];
        let prompt = feedback_analysis_prompt(&questions, &answers, &setup());

        assert!(prompt.contains("Question (Motivation): Why us?\nAnswer: Because."));
        assert!(prompt.contains(
            "Question (Growth): Tell me about a failure.\nAnswer: No response provided."
        ));
        assert!(prompt.contains("\"overallScore\": 80"));
    }

    #[test]
    fn analysis_prompt_treats_short_answer_vec_as_skipped() {
        let questions = vec![Question::new("Q1", "A"), Question::new("Q2", "B")];
        let prompt = feedback_analysis_prompt(&questions, &[], &setup());
        assert_eq!(prompt.matches(NO_RESPONSE_PLACEHOLDER).count(), 2);
    }

    #[test]
    fn parse_questions_numbered_list_with_categories() {
        let text = "Here are your questions:\n\n\
                    1. Tell me about a conflict you resolved.\n\
                    Category: Teamwork\n\n\
                    2. How do you prioritize under pressure?\n\
                    Category: Problem Solving\n";
        let questions = parse_questions(text);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "Tell me about a conflict you resolved.");
        assert_eq!(questions[0].category, "Teamwork");
        assert_eq!(questions[1].category, "Problem Solving");
    }

    #[test]
    fn parse_questions_defaults_category_to_general() {
        let questions = parse_questions("1. What motivates you?\n");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].category, "General");
    }

    #[test]
    fn parse_questions_truncates_to_five() {
        let text = (1..=8)
            .map(|i| format!("{i}. Question number {i}?\nCategory: General\n"))
            .collect::<String>();
        let questions = parse_questions(&text);
        assert_eq!(questions.len(), MAX_PARSED_QUESTIONS);
        assert_eq!(questions[4].question, "Question number 5?");
    }

    #[test]
    fn parse_questions_empty_input_yields_nothing() {
        assert!(parse_questions("").is_empty());
        assert!(parse_questions("No list here, sorry.").is_empty());
    }

    #[test]
    fn parse_questions_strips_category_line_from_text() {
        let questions = parse_questions("1. What is ownership?\nCategory: Technical Skills\n");
        assert_eq!(questions[0].question, "What is ownership?");
        assert!(!questions[0].question.contains("Category"));
    }

    #[test]
    fn extract_json_block_fenced_json() {
        let text = "Here you go:\n```json\n{\"overallScore\": 78}\n```\nGood luck!";
        assert_eq!(extract_json_block(text), Some("{\"overallScore\": 78}"));
    }

    #[test]
    fn extract_json_block_bare_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_block(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn extract_json_block_bare_braces() {
        let text = "The report is {\"overallScore\": 60, \"metrics\": []} as requested.";
        assert_eq!(
            extract_json_block(text),
            Some("{\"overallScore\": 60, \"metrics\": []}")
        );
    }

    #[test]
    fn extract_json_block_none_when_absent() {
        assert_eq!(extract_json_block("no json here"), None);
        assert_eq!(extract_json_block("} backwards {"), None);
    }
}
