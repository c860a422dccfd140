//! Interactive shell.
//!
//! Pure presentation: menu loop, file path collection, result display.
//! Every failure arrives as a `LensError` value from the pipeline and is
//! shown to the user; nothing here retries or persists partial results.

use crate::loader::{self, Document};
use crate::store::OutputStore;
use anyhow::Result;
use std::io::{self, Write};
use std::path::PathBuf;
use textlens_core::types::{AnalysisRequest, AnalysisResult, Operation};
use textlens_core::AnalysisExecutor;

pub struct Shell {
    executor: AnalysisExecutor,
    store: OutputStore,
}

impl Shell {
    pub fn new(executor: AnalysisExecutor, store: OutputStore) -> Self {
        Self { executor, store }
    }

    /// Run the main menu loop until the user exits.
    pub async fn run(&self) -> Result<()> {
        print_welcome();

        loop {
            print_menu();
            let operation = match self.read_menu_choice()? {
                Some(operation) => operation,
                None => break,
            };

            let document = match self.read_document()? {
                Some(document) => document,
                None => continue,
            };

            let request = match self.build_request(operation, &document)? {
                Some(request) => request,
                None => continue,
            };

            println!("* Running {} on {}...", operation, document.name);
            match self.executor.analyze(&document.name, request).await {
                Ok(record) => {
                    display_result(&record.result);
                    println!(
                        "Detected language: {} ({} words)",
                        record.language_detected, record.word_count
                    );
                    match self.store.save(&record) {
                        Ok(path) => println!("Saved to {}", path.display()),
                        Err(err) => println!("error: failed to save output: {err}"),
                    }
                }
                Err(err) => println!("error: {err}"),
            }

            println!();
            if !matches!(prompt_line("Process another file? (y/n): ")?.as_str(), "y" | "Y") {
                break;
            }
        }

        println!("\nGoodbye.");
        Ok(())
    }

    /// Returns `None` when the user picked Exit.
    fn read_menu_choice(&self) -> Result<Option<Operation>> {
        loop {
            let choice = prompt_line("Select option (1-4): ")?;
            match choice.as_str() {
                "1" => return Ok(Some(Operation::Summarize)),
                "2" => return Ok(Some(Operation::Translate)),
                "3" => return Ok(Some(Operation::Sentiment)),
                "4" => return Ok(None),
                _ => println!("Invalid choice. Please enter 1, 2, 3, or 4."),
            }
        }
    }

    /// Returns `None` when the user gives up on entering a path.
    fn read_document(&self) -> Result<Option<Document>> {
        loop {
            let raw = prompt_line("Enter file path: ")?;
            if raw.is_empty() {
                println!("error: file path cannot be empty");
                continue;
            }

            match loader::load(&PathBuf::from(&raw)) {
                Ok(document) => return Ok(Some(document)),
                Err(err) => {
                    println!("error: {err}");
                    if !matches!(prompt_line("Try again? (y/n): ")?.as_str(), "y" | "Y") {
                        return Ok(None);
                    }
                }
            }
        }
    }

    /// Returns `None` when required options are missing or invalid.
    fn build_request(
        &self,
        operation: Operation,
        document: &Document,
    ) -> Result<Option<AnalysisRequest>> {
        let request = match operation {
            Operation::Summarize => AnalysisRequest::summarize(document.text.clone()),
            Operation::Sentiment => AnalysisRequest::sentiment(document.text.clone()),
            Operation::Translate => {
                let target =
                    prompt_line("Enter target language (e.g. Spanish, French, German): ")?;
                AnalysisRequest::translate(document.text.clone(), target)
            }
        };

        match request {
            Ok(request) => Ok(Some(request)),
            Err(err) => {
                println!("error: {err}");
                Ok(None)
            }
        }
    }
}

fn print_welcome() {
    println!("============================================================");
    println!("  textlens - document analysis");
    println!("  summarize, translate, and sentiment-analyze documents");
    println!("============================================================");
}

fn print_menu() {
    println!();
    println!("Available actions:");
    println!("  1. Summarize - generate a summary and key points");
    println!("  2. Translate - translate the document to another language");
    println!("  3. Sentiment - analyze sentiment and tone");
    println!("  4. Exit");
    println!();
}

fn display_result(result: &AnalysisResult) {
    println!();
    println!("---------------------------- RESULT ----------------------------");
    match result {
        AnalysisResult::Summary(summary) => {
            println!("Summary:");
            println!("{}", summary.summary);
            println!();
            println!("Key points:");
            for (index, point) in summary.key_points.iter().enumerate() {
                println!("  {}. {point}", index + 1);
            }
        }
        AnalysisResult::Translation(translation) => {
            println!("Source language: {}", translation.source_language);
            println!("Target language: {}", translation.target_language);
            println!();
            println!("Translation:");
            println!("{}", translation.translated_text);
        }
        AnalysisResult::Sentiment(sentiment) => {
            println!("Sentiment:  {}", sentiment.sentiment);
            println!("Confidence: {:.0}%", sentiment.confidence * 100.0);
            println!("Explanation:");
            println!("{}", sentiment.explanation);
        }
    }
    println!("----------------------------------------------------------------");
}

fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
