//! Console module - Contains the interactive terminal front end for the
//! clinic.
//!
//! The console owns the receiving half of the notification channel and the
//! auto-save engine handle. Every screen reads a line, calls into [`crate::core`],
//! then drains and prints whatever notifications the operation queued. Core
//! operations never print; everything the user sees goes through here.

/// Per-feature screens: invoicing, catalog, reports, accounts, data tools.
mod screens;

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin, stdin};
use tokio::sync::mpsc;

use crate::{
    context::ClinicContext,
    core::account,
    entities::{Role, User},
    errors::Result,
    notify::{Notification, Severity},
    store::AutosaveEngine,
};

/// Where the session goes after a menu action.
#[derive(Clone, Copy, Debug)]
enum Flow {
    /// Stay in the menu.
    Continue,
    /// Back to the login prompt.
    Logout,
    /// Leave the program.
    Quit,
}

/// Interactive terminal session over the clinic document.
pub struct Console {
    ctx: ClinicContext,
    engine: AutosaveEngine,
    events: mpsc::UnboundedReceiver<Notification>,
    clinic_name: String,
    input: Lines<BufReader<Stdin>>,
}

impl Console {
    /// Creates a console over the given context and engine.
    ///
    /// `events` must be the receiver paired with the context's notifier,
    /// otherwise operation outcomes are never shown.
    #[must_use]
    pub fn new(
        ctx: ClinicContext,
        engine: AutosaveEngine,
        events: mpsc::UnboundedReceiver<Notification>,
        clinic_name: String,
    ) -> Self {
        Self {
            ctx,
            engine,
            events,
            clinic_name,
            input: BufReader::new(stdin()).lines(),
        }
    }

    /// Runs login and menu loops until the user quits or stdin closes.
    ///
    /// The auto-save engine is shut down on the way out, which flushes any
    /// pending change before the process ends.
    pub async fn run(mut self) -> Result<()> {
        self.render_events();
        let outcome = self.session_loop().await;
        self.engine.shutdown().await;
        outcome
    }

    async fn session_loop(&mut self) -> Result<()> {
        loop {
            let Some(user) = self.login().await? else {
                return Ok(());
            };
            loop {
                match self.menu(&user).await? {
                    Flow::Continue => {}
                    Flow::Logout => {
                        self.say(Severity::Success, "Logged out successfully");
                        break;
                    }
                    Flow::Quit => return Ok(()),
                }
            }
        }
    }

    /// Prompts for credentials until a login succeeds. `None` means stdin
    /// closed.
    async fn login(&mut self) -> Result<Option<User>> {
        println!();
        println!("{} sign in", self.clinic_name);
        loop {
            let Some(username) = self.prompt("Username: ").await? else {
                return Ok(None);
            };
            let Some(password) = self.prompt("Password: ").await? else {
                return Ok(None);
            };
            match account::authenticate(&self.ctx, &username, &password).await {
                Ok(user) => {
                    self.render_events();
                    return Ok(Some(user));
                }
                // Rendered on the login screen, not as a notification.
                Err(e) => println!("❌ {e}"),
            }
        }
    }

    async fn menu(&mut self, user: &User) -> Result<Flow> {
        println!();
        println!("  [1] New invoice     [2] Invoices   [3] Services");
        println!("  [4] Change password [5] Status     [6] Save database now");
        if user.role == Role::Admin {
            println!("  [7] Reports         [8] Prices     [9] Users   [10] Database tools");
        }
        println!("  [0] Logout          [q] Quit");

        let Some(choice) = self.prompt("Select an option: ").await? else {
            return Ok(Flow::Quit);
        };
        match choice.trim() {
            "1" => self.new_invoice(user).await?,
            "2" => self.list_invoices(user).await?,
            "3" => self.browse_services().await?,
            "4" => self.change_password(user).await?,
            "5" => self.show_status().await,
            "6" => self.save_database().await,
            "7" => self.reports(user).await?,
            "8" => self.manage_prices(user).await?,
            "9" => self.manage_users(user).await?,
            "10" => self.database_tools(user).await?,
            "0" => return Ok(Flow::Logout),
            "q" | "Q" | "quit" | "exit" => return Ok(Flow::Quit),
            "" => {}
            other => println!("Unknown option: {other}"),
        }
        Ok(Flow::Continue)
    }

    /// Prints `label` without a newline and reads one line. `None` means
    /// stdin closed; screens treat that as "go back".
    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        Ok(self.input.next_line().await?)
    }

    /// Asks a yes/no question. Anything but `y`/`yes` declines.
    async fn confirm(&mut self, question: &str) -> Result<bool> {
        let Some(answer) = self.prompt(&format!("{question} [y/N]: ")).await? else {
            return Ok(false);
        };
        let answer = answer.trim();
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }

    /// Prints every notification queued since the last call, oldest first.
    fn render_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            println!("{} {}", glyph(event.severity), event.message);
        }
    }

    /// Prints a message in the same style as rendered notifications.
    #[allow(clippy::unused_self)]
    fn say(&self, severity: Severity, message: impl std::fmt::Display) {
        println!("{} {message}", glyph(severity));
    }

    /// Gate for admin-only screens.
    fn require_admin(&self, user: &User) -> bool {
        if user.role == Role::Admin {
            return true;
        }
        self.say(Severity::Error, "Access denied. Admin privileges required.");
        false
    }
}

const fn glyph(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "✅",
        Severity::Error => "❌",
        Severity::Warning => "⚠️",
    }
}
