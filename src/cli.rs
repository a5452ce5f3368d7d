//! Interactive CLI front-end — renders each stage and drives the session.
//!
//! Presentation only: reads aggregate snapshots, raises transitions, and
//! exercises the backend collaborator hooks (resume analysis, company
//! lookup). All session logic lives in [`InterviewSession`].

use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::config::AppConfig;
use crate::error::Error;
use crate::session::{
    FeedbackReport, InterviewKind, InterviewSession, InterviewStage, SetupData,
};
use crate::sources::Sources;

type StdinLines = Lines<BufReader<Stdin>>;

/// Run the interview loop until the user quits or stdin closes.
pub async fn run(
    session: InterviewSession,
    sources: &Sources,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        match session.stage().await {
            InterviewStage::Setup => {
                let Some(setup) = collect_setup(&mut lines).await? else {
                    break;
                };

                if let Some(backend) = &sources.backend {
                    run_collaborator_hooks(backend, &setup).await;
                }

                match session.submit_setup(setup).await {
                    Ok(()) => {
                        let snapshot = session.snapshot().await;
                        println!(
                            "\nInterview started: {} questions ahead. \
                             You have ~{}s per question.\n",
                            snapshot.total_questions(),
                            config.question_time_limit_secs,
                        );
                    }
                    Err(e) => {
                        eprintln!("⚠️  Could not generate questions: {e}");
                        eprintln!("   Check your configuration and try again.\n");
                    }
                }
            }

            InterviewStage::Questions => {
                let snapshot = session.snapshot().await;
                let Some(question) = snapshot.current_question() else {
                    break;
                };
                println!(
                    "Question {}/{} [{}]",
                    snapshot.current_index + 1,
                    snapshot.total_questions(),
                    question.category,
                );
                println!("{}\n", question.question);
                eprint!("Your answer (Enter to skip, /restart, /quit)> ");

                let Some(line) = lines.next_line().await? else {
                    break;
                };
                let result = match line.trim() {
                    "/quit" => break,
                    "/restart" => {
                        session.restart().await;
                        continue;
                    }
                    "" | "/skip" => session.skip_current_question().await,
                    answer => session.complete_current_question(answer).await,
                };

                if let Err(e) = result {
                    match e {
                        Error::Source(e) => {
                            eprintln!("⚠️  Could not analyze your answers: {e}");
                            eprintln!("   Answer or skip again to retry.\n");
                        }
                        other => eprintln!("⚠️  {other}"),
                    }
                }
            }

            InterviewStage::Feedback => {
                let snapshot = session.snapshot().await;
                if let Some(report) = &snapshot.feedback {
                    println!("{}", format_feedback(report));
                }
                eprint!("Press Enter to practice again, or /quit> ");
                match lines.next_line().await? {
                    Some(line) if line.trim() == "/quit" => break,
                    Some(_) => session.restart().await,
                    None => break,
                }
            }
        }
    }

    Ok(())
}

/// Collect and validate a setup from stdin. `None` means EOF.
async fn collect_setup(lines: &mut StdinLines) -> anyhow::Result<Option<SetupData>> {
    println!("── Interview setup ──");

    let kind = loop {
        let Some(input) = prompt(lines, "Interview kind (behavioral/technical)").await? else {
            return Ok(None);
        };
        match input.parse::<InterviewKind>() {
            Ok(kind) => break kind,
            Err(e) => eprintln!("⚠️  {e}"),
        }
    };

    let Some(position_title) = prompt(lines, "Position title").await? else {
        return Ok(None);
    };
    let Some(company) = prompt(lines, "Company").await? else {
        return Ok(None);
    };
    let Some(job_description) = prompt(lines, "Job description").await? else {
        return Ok(None);
    };
    let Some(skills_input) = prompt(lines, "Top skills (comma-separated, max 5)").await? else {
        return Ok(None);
    };
    let Some(resume_input) = prompt(lines, "Resume path (optional)").await? else {
        return Ok(None);
    };

    let setup = SetupData {
        interview_type: kind,
        position_title,
        company,
        job_description,
        skills: parse_skills(&skills_input),
        resume_path: if resume_input.is_empty() {
            None
        } else {
            Some(PathBuf::from(resume_input))
        },
    };

    if let Err(e) = setup.validate() {
        eprintln!("⚠️  {e}\n");
        return Box::pin(collect_setup(lines)).await;
    }
    Ok(Some(setup))
}

/// Print a prompt and read one trimmed line. `None` means EOF.
async fn prompt(lines: &mut StdinLines, label: &str) -> anyhow::Result<Option<String>> {
    eprint!("{label}> ");
    Ok(lines.next_line().await?.map(|l| l.trim().to_string()))
}

/// Exercise the backend collaborator hooks the state machine never
/// drives: company lookup and resume analysis. Both are best-effort.
async fn run_collaborator_hooks(backend: &crate::sources::BackendClient, setup: &SetupData) {
    if let Some(info) = backend.company_info(&setup.company).await {
        println!("Company context: {info}");
    }

    if let Some(path) = &setup.resume_path {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume")
            .to_string();
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                match backend
                    .analyze_resume(&file_name, bytes, &setup.job_description)
                    .await
                {
                    Ok(analysis) => println!("Resume analysis: {}", analysis.message),
                    Err(e) => eprintln!("⚠️  Resume analysis failed: {e}"),
                }
            }
            Err(e) => eprintln!("⚠️  Could not read resume {}: {e}", path.display()),
        }
    }
}

/// Split a comma-separated skill list, dropping blanks.
fn parse_skills(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Render a feedback report for the terminal.
fn format_feedback(report: &FeedbackReport) -> String {
    let mut out = String::new();
    out.push_str("\n── Feedback ──\n");
    out.push_str(&format!("Overall score: {}/100\n\n", report.overall_score));

    for metric in &report.metrics {
        out.push_str(&format!(
            "  {}: {}/100 ({})\n",
            metric.name, metric.score, metric.description
        ));
    }

    out.push_str("\nStrengths:\n");
    for s in &report.strengths {
        out.push_str(&format!("  + {s}\n"));
    }

    out.push_str("\nAreas for improvement:\n");
    for i in &report.improvements {
        out.push_str(&format!("  - {i}\n"));
    }

    out.push_str(&format!("\n{}\n", report.summary));
    out
}
