//! Menu screens. Each one gathers input, calls a core operation, and prints
//! whatever the operation reported.

use chrono::{Months, Utc};

use super::Console;
use crate::{
    core::{
        account::{self, UserUpdate},
        catalog, export,
        invoice::{self, InvoiceDraft, PatientInfo},
        report,
    },
    entities::{Invoice, Role, Service, User},
    errors::Result,
    notify::Severity,
    store::{CURRENCY, DOCUMENT_VERSION, SnapshotKind, export_snapshot},
};

impl Console {
    /// Service selection, patient details, then invoice creation.
    pub(super) async fn new_invoice(&mut self, user: &User) -> Result<()> {
        let services = self.ctx.store.services().await;
        print_catalog(&services);
        println!();

        let Some(ids) = self.prompt("Service ids (comma separated): ").await? else {
            return Ok(());
        };
        let mut draft = InvoiceDraft::new();
        for token in ids.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token
                .parse::<i64>()
                .ok()
                .and_then(|id| services.iter().find(|s| s.id == id))
            {
                Some(service) => draft.select(service),
                None => println!("❌ Unknown service id: {token}"),
            }
        }
        if !draft.is_empty() {
            for line in draft.lines() {
                println!("  {} - {CURRENCY} {:.2}", line.name, line.price);
            }
            println!("  Total: {CURRENCY} {:.2}", draft.total());
        }

        let Some(name) = self.prompt("Patient name: ").await? else {
            return Ok(());
        };
        let Some(phone) = self.prompt("Phone (optional): ").await? else {
            return Ok(());
        };
        let Some(age) = self.prompt("Age (optional): ").await? else {
            return Ok(());
        };
        let Some(gender) = self.prompt("Gender (optional): ").await? else {
            return Ok(());
        };
        let Some(address) = self.prompt("Address (optional): ").await? else {
            return Ok(());
        };

        let patient = PatientInfo {
            name,
            phone: Some(phone),
            age: Some(age),
            gender: Some(gender),
            address: Some(address),
        };
        let created = invoice::create_invoice(&self.ctx, patient, &draft, &user.username).await;
        self.render_events();
        if let Ok(created) = created {
            self.print_receipt(&created);
        }
        Ok(())
    }

    /// Lists the ten most recent invoices the user may see. Admins are also
    /// offered a CSV export of the full history.
    pub(super) async fn list_invoices(&mut self, user: &User) -> Result<()> {
        let invoices = self.ctx.store.invoices().await;
        let visible = report::invoices_for_user(&invoices, &user.username, user.role);
        if visible.is_empty() {
            println!("No invoices yet.");
            return Ok(());
        }

        println!("{} invoices on record.", visible.len());
        for item in visible.iter().rev().take(10) {
            println!(
                "  {:<18} {:<20} {CURRENCY} {:>9.2}  {:<12} {}",
                item.invoice_number,
                item.patient_name,
                item.total_amount,
                item.created_by,
                item.created_at.format("%Y-%m-%d"),
            );
        }
        if visible.len() > 10 {
            println!("Showing the 10 most recent.");
        }

        if user.role == Role::Admin && self.confirm("Export all invoices to CSV?").await? {
            self.export_invoices_csv().await;
        }
        Ok(())
    }

    async fn export_invoices_csv(&self) {
        let invoices = self.ctx.store.invoices().await;
        if invoices.is_empty() {
            self.say(Severity::Warning, "No invoices to export");
            return;
        }
        let artifact = export::invoices_csv(&invoices, Utc::now());
        match tokio::fs::write(&artifact.file_name, &artifact.contents).await {
            Ok(()) => {
                println!("Wrote {}", artifact.file_name);
                self.say(Severity::Success, "Invoices exported successfully!");
            }
            Err(e) => self.say(Severity::Error, format!("Failed to export invoices: {e}")),
        }
    }

    /// Catalog browser with a name search.
    pub(super) async fn browse_services(&mut self) -> Result<()> {
        let services = self.ctx.store.services().await;
        let Some(query) = self.prompt("Search services (blank for all): ").await? else {
            return Ok(());
        };
        let query = query.trim();
        if query.is_empty() {
            print_catalog(&services);
            return Ok(());
        }

        let matches = catalog::filter_by_text(&services, query);
        if matches.is_empty() {
            println!("No services match '{query}'.");
        }
        for service in matches {
            print_service_row(service);
        }
        Ok(())
    }

    pub(super) async fn change_password(&mut self, user: &User) -> Result<()> {
        let Some(current) = self.prompt("Current password: ").await? else {
            return Ok(());
        };
        let Some(new) = self.prompt("New password: ").await? else {
            return Ok(());
        };
        let Some(confirmation) = self.prompt("Confirm new password: ").await? else {
            return Ok(());
        };
        if new != confirmation {
            self.say(Severity::Error, "New passwords do not match");
            return Ok(());
        }

        let _ = account::change_password(&self.ctx, user.id, &current, &new).await;
        self.render_events();
        Ok(())
    }

    pub(super) async fn show_status(&self) {
        let records = self.ctx.store.record_count().await;
        let last_saved = self.engine.last_saved().map_or_else(
            || "never".to_string(),
            |at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        println!("Database:   connected");
        println!("Records:    {records}");
        println!("Last saved: {last_saved}");
        println!("Auto-save:  active");
        println!("Version:    {DOCUMENT_VERSION}");
        println!("Currency:   {CURRENCY}");
    }

    pub(super) async fn save_database(&mut self) {
        // Outcome arrives as a notification either way.
        let _ = self.engine.save_now().await;
        self.render_events();
    }

    /// Revenue summary plus the ten most billed services.
    pub(super) async fn reports(&mut self, user: &User) -> Result<()> {
        if !self.require_admin(user) {
            return Ok(());
        }
        let invoices = self.ctx.store.invoices().await;
        let summary = report::revenue_summary(&invoices, Utc::now());

        println!();
        println!("📊 Revenue");
        println!("  Invoices:   {}", summary.invoice_count);
        println!("  Total:      {CURRENCY} {:.2}", summary.total);
        println!("  Today:      {CURRENCY} {:.2}", summary.today);
        println!("  This month: {CURRENCY} {:.2}", summary.month);

        let top = report::top_services(&invoices, 10);
        if !top.is_empty() {
            println!();
            println!("Top services:");
            for (rank, usage) in top.iter().enumerate() {
                println!(
                    "  {:>2}. {:<40} {:>4} billed  {CURRENCY} {:>9.2}",
                    rank + 1,
                    usage.name,
                    usage.count,
                    usage.revenue,
                );
            }
        }
        Ok(())
    }

    /// Single price update and the percentage change over the whole catalog.
    pub(super) async fn manage_prices(&mut self, user: &User) -> Result<()> {
        if !self.require_admin(user) {
            return Ok(());
        }
        let services = self.ctx.store.services().await;
        print_catalog(&services);
        println!();

        let Some(id_input) = self.prompt("Service id to update (blank to skip): ").await? else {
            return Ok(());
        };
        let id_input = id_input.trim();
        if !id_input.is_empty() {
            let service_id = id_input.parse::<i64>().unwrap_or(-1);
            let Some(price_input) = self.prompt("New price: ").await? else {
                return Ok(());
            };
            let _ =
                catalog::update_price(&self.ctx, service_id, parse_amount(&price_input)).await;
            self.render_events();
        }

        let Some(pct_input) = self
            .prompt("Enter percentage change (e.g., 10 for +10%, -5 for -5%), blank to skip: ")
            .await?
        else {
            return Ok(());
        };
        let pct_input = pct_input.trim();
        if pct_input.is_empty() {
            return Ok(());
        }
        let proposal = match catalog::propose_bulk_reprice(&self.ctx, parse_amount(pct_input)).await
        {
            Ok(proposal) => proposal,
            Err(_) => {
                self.render_events();
                return Ok(());
            }
        };

        let direction = if proposal.percentage >= 0.0 {
            "increase"
        } else {
            "decrease"
        };
        let question = format!(
            "Are you sure you want to {direction} all prices by {}%?",
            proposal.percentage.abs(),
        );
        if self.confirm(&question).await? {
            catalog::apply_bulk_reprice(&self.ctx, &proposal).await;
            self.render_events();
        }
        Ok(())
    }

    pub(super) async fn manage_users(&mut self, user: &User) -> Result<()> {
        if !self.require_admin(user) {
            return Ok(());
        }
        let users = self.ctx.store.users().await;
        println!();
        println!("User accounts:");
        for item in &users {
            println!("  [{:>2}] {:<20} {}", item.id, item.username, item.role.as_str());
        }
        println!();

        let Some(choice) = self
            .prompt("[a]dd, [e]dit, [d]elete, blank to go back: ")
            .await?
        else {
            return Ok(());
        };
        match choice.trim() {
            "a" => self.add_account().await?,
            "e" => self.edit_account().await?,
            "d" => self.delete_account(user).await?,
            _ => {}
        }
        Ok(())
    }

    async fn add_account(&mut self) -> Result<()> {
        let Some(username) = self.prompt("Username: ").await? else {
            return Ok(());
        };
        let Some(password) = self.prompt("Password: ").await? else {
            return Ok(());
        };
        let Some(role_input) = self.prompt("Role (user/admin): ").await? else {
            return Ok(());
        };

        let _ = account::add_user(&self.ctx, &username, &password, parse_role(&role_input)).await;
        self.render_events();
        Ok(())
    }

    async fn edit_account(&mut self) -> Result<()> {
        let Some(id_input) = self.prompt("User id: ").await? else {
            return Ok(());
        };
        let user_id = id_input.trim().parse::<i64>().unwrap_or(-1);
        let users = self.ctx.store.users().await;
        let Some(existing) = users.iter().find(|u| u.id == user_id) else {
            self.say(Severity::Error, "User not found");
            return Ok(());
        };

        let Some(username) = self
            .prompt(&format!("Username [{}]: ", existing.username))
            .await?
        else {
            return Ok(());
        };
        let username = if username.trim().is_empty() {
            existing.username.clone()
        } else {
            username
        };
        let Some(role_input) = self
            .prompt(&format!("Role (user/admin) [{}]: ", existing.role.as_str()))
            .await?
        else {
            return Ok(());
        };
        let role = if role_input.trim().is_empty() {
            existing.role
        } else {
            parse_role(&role_input)
        };
        let Some(password) = self.prompt("New password (blank keeps current): ").await? else {
            return Ok(());
        };

        let update = UserUpdate {
            username,
            role,
            password: Some(password),
        };
        let _ = account::update_user(&self.ctx, user_id, update).await;
        self.render_events();
        Ok(())
    }

    async fn delete_account(&mut self, session: &User) -> Result<()> {
        let Some(id_input) = self.prompt("User id: ").await? else {
            return Ok(());
        };
        let user_id = id_input.trim().parse::<i64>().unwrap_or(-1);
        if user_id == session.id {
            self.say(Severity::Error, "You cannot delete your own account.");
            return Ok(());
        }

        if self.confirm("Are you sure you want to delete this user?").await? {
            let _ = account::delete_user(&self.ctx, user_id).await;
            self.render_events();
        }
        Ok(())
    }

    /// Backup, export, and the old-invoice purge.
    pub(super) async fn database_tools(&mut self, user: &User) -> Result<()> {
        if !self.require_admin(user) {
            return Ok(());
        }
        println!();
        println!("  [1] Create backup");
        println!("  [2] Export data");
        println!("  [3] Clear old invoices");

        let Some(choice) = self.prompt("Select a tool (blank to go back): ").await? else {
            return Ok(());
        };
        match choice.trim() {
            "1" => self.create_backup().await,
            "2" => self.export_data().await,
            "3" => self.purge_old_invoices().await?,
            _ => {}
        }
        Ok(())
    }

    async fn create_backup(&self) {
        match self.write_snapshot(SnapshotKind::Backup).await {
            Ok(file_name) => {
                println!("Wrote {file_name}");
                self.say(Severity::Success, "Backup created successfully!");
            }
            Err(e) => self.say(Severity::Error, format!("Failed to create backup: {e}")),
        }
    }

    async fn export_data(&self) {
        match self.write_snapshot(SnapshotKind::Export).await {
            Ok(file_name) => {
                println!("Wrote {file_name}");
                self.say(Severity::Success, "Data exported successfully!");
            }
            Err(e) => self.say(Severity::Error, format!("Failed to export data: {e}")),
        }
    }

    async fn write_snapshot(&self, kind: SnapshotKind) -> Result<String> {
        let artifact = export_snapshot(&self.ctx.store, kind, &self.clinic_name).await?;
        tokio::fs::write(&artifact.file_name, &artifact.contents).await?;
        Ok(artifact.file_name)
    }

    async fn purge_old_invoices(&mut self) -> Result<()> {
        let Some(cutoff) = Utc::now().checked_sub_months(Months::new(12)) else {
            return Ok(());
        };
        let proposal = invoice::propose_purge(&self.ctx, cutoff).await;
        println!("{} invoices are older than 1 year.", proposal.affected);

        let question = "Clear invoices older than 1 year? This action cannot be undone.";
        if self.confirm(question).await? {
            invoice::apply_purge(&self.ctx, &proposal).await;
            self.render_events();
        }
        Ok(())
    }

    fn print_receipt(&self, created: &Invoice) {
        println!();
        println!("{:-^62}", "");
        println!("{:^62}", self.clinic_name);
        println!("{:^62}", format!("Invoice {}", created.invoice_number));
        println!();
        println!("Patient: {}", created.patient_name);
        if let Some(phone) = &created.patient_phone {
            println!("Phone:   {phone}");
        }
        if let Some(age) = &created.patient_age {
            println!("Age:     {age}");
        }
        if let Some(gender) = &created.patient_gender {
            println!("Gender:  {gender}");
        }
        if let Some(address) = &created.patient_address {
            println!("Address: {address}");
        }
        println!("Date:    {}", created.created_at.format("%Y-%m-%d %H:%M"));
        println!();
        for line in &created.services {
            println!("  {:<44} {CURRENCY} {:>9.2}", line.name, line.price);
        }
        println!("  {:<44} {CURRENCY} {:>9.2}", "Total", created.total_amount);
        println!();
        println!("Thank you for choosing {}!", self.clinic_name);
        println!("For any queries, please contact our clinic.");
        println!("{:-^62}", "");
    }
}

fn print_catalog(services: &[Service]) {
    for (category, members) in catalog::services_by_category(services) {
        println!();
        println!("{category}:");
        for service in members {
            print_service_row(service);
        }
    }
}

fn print_service_row(service: &Service) {
    println!(
        "  [{:>2}] {:<44} {CURRENCY} {:>8.2}",
        service.id, service.name, service.price,
    );
}

/// Free-form numeric input. Anything unparseable becomes NaN, which the core
/// validators reject with their own message.
fn parse_amount(input: &str) -> f64 {
    input.trim().parse().unwrap_or(f64::NAN)
}

fn parse_role(input: &str) -> Role {
    if input.trim().eq_ignore_ascii_case("admin") {
        Role::Admin
    } else {
        Role::User
    }
}
