// src/cli/interactive.rs
use std::path::PathBuf;
use dialoguer::{theme::ColorfulTheme, Input};
use tracing::debug;

use crate::context::Context;
use crate::error::{ThreatScopeResult, ThreatScopeError};
use crate::events::{analyze_channel, subscribe, AnalyzeControls, Subscription, Trigger};
use crate::gate::{validate_initials, AccessGate, DISCLAIMER, MIN_INITIALS_LEN};

use super::commands::report_outcome;

pub struct InteractiveShell<'a> {
    context: &'a Context,
    controls: AnalyzeControls,
    subscription: Option<Subscription>,
    output: PathBuf,
    theme: ColorfulTheme,
}

impl<'a> InteractiveShell<'a> {
    pub fn new(context: &'a Context, output: PathBuf) -> Self {
        let (controls, receiver) = analyze_channel();
        let subscription = subscribe(context.orchestrator.clone(), receiver);

        Self {
            context,
            controls,
            subscription: Some(subscription),
            output,
            theme: ColorfulTheme::default(),
        }
    }

    pub async fn run(&mut self) -> ThreatScopeResult<()> {
        if self.context.config.gate.enabled {
            self.show_disclaimer()?;
        }

        println!("ThreatScope Interactive Shell");
        println!("Enter a target to analyze, 'help' for assistance or 'exit' to quit");

        loop {
            let line: String = Input::with_theme(&self.theme)
                .with_prompt("target")
                .allow_empty(true)
                .interact_text()
                .map_err(|e| ThreatScopeError::UnexpectedError(format!("Input error: {}", e)))?;

            match line.trim() {
                "exit" | "quit" => break,
                "help" => self.show_help(),
                "history" => self.show_history(),
                cmd if cmd == "analyze" || cmd.starts_with("analyze ") => {
                    self.analyze(&cmd["analyze".len()..], Trigger::Button).await?;
                }
                _ => self.analyze(&line, Trigger::EnterKey).await?,
            }
        }

        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }

        Ok(())
    }

    fn show_disclaimer(&self) -> ThreatScopeResult<()> {
        let gate = AccessGate::new(&self.context.session);
        if gate.is_accepted() {
            return Ok(());
        }

        println!("{}", DISCLAIMER);

        let initials: String = Input::with_theme(&self.theme)
            .with_prompt("Enter your initials to continue")
            .validate_with(|input: &String| -> Result<(), String> {
                if validate_initials(input) {
                    Ok(())
                } else {
                    Err(format!("Please enter at least {} characters", MIN_INITIALS_LEN))
                }
            })
            .interact_text()
            .map_err(|e| ThreatScopeError::UnexpectedError(format!("Input error: {}", e)))?;

        gate.accept(&initials)
    }

    fn show_help(&self) {
        println!("ThreatScope - OSINT threat scanner");
        println!("Available commands:");
        println!("  <target>            Analyze a target (domain, email, phone, ...)");
        println!("  analyze <target>    Same as above");
        println!("  history             Show targets analyzed this session");
        println!("  help                Show this help message");
        println!("  exit                Exit the interactive shell");
        println!("Results are written to {}", self.output.display());
    }

    fn show_history(&self) {
        let history = self.context.orchestrator.history();
        if history.is_empty() {
            println!("No targets analyzed yet");
            return;
        }

        for entry in history {
            println!("- {} ({})", entry.target, entry.submitted_at.format("%H:%M:%S"));
        }
    }

    async fn analyze(&self, target: &str, trigger: Trigger) -> ThreatScopeResult<()> {
        debug!("Shell analyze via {:?}", trigger);

        let outcome = match trigger {
            Trigger::Button => self.controls.click(target).await?,
            Trigger::EnterKey => self.controls.press_enter(target).await?,
        };

        self.context.display.write_html(&self.output).await?;
        report_outcome(target, outcome, &self.output);

        Ok(())
    }
}
