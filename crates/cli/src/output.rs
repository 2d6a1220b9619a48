//! Rendering of command results on stdout.
//!
//! Logs go to stderr, so stdout carries results only.

#![allow(clippy::print_stdout)]

use serde::Serialize;

use cafe_spot_app::db::SeedReport;
use cafe_spot_app::models::{Cafe, CurrentUser, LookedUpAddress};

/// Text or JSON printer.
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    fn print_json<T: Serialize + ?Sized>(value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{text}"),
            Err(e) => tracing::error!(error = %e, "Failed to render JSON output"),
        }
    }

    pub fn masked_tax_id(&self, masked: &str) {
        if self.json {
            Self::print_json(&serde_json::json!({ "cnpj": masked }));
        } else {
            println!("{masked}");
        }
    }

    pub fn seed_report(&self, report: &SeedReport) {
        if self.json {
            Self::print_json(&serde_json::json!({
                "adminCreated": report.admin_created,
                "cafesInserted": report.cafes_inserted,
                "passwordsUpgraded": report.passwords_upgraded,
            }));
            return;
        }
        if *report == SeedReport::default() {
            println!("Nothing to seed; collections already hold data.");
            return;
        }
        if report.admin_created {
            println!("Created default administrator.");
        }
        if report.cafes_inserted > 0 {
            println!("Inserted {} example listings.", report.cafes_inserted);
        }
        if report.passwords_upgraded > 0 {
            println!("Hashed {} stored plain password(s).", report.passwords_upgraded);
        }
    }

    pub fn logged_in(&self, user: &CurrentUser) {
        if self.json {
            Self::print_json(user);
        } else {
            println!("Logged in as {} <{}> ({})", user.name, user.email, user.user_type);
        }
    }

    pub fn session(&self, user: Option<&CurrentUser>) {
        match (self.json, user) {
            (true, user) => Self::print_json(&user),
            (false, Some(user)) => {
                println!("{} <{}> ({})", user.name, user.email, user.user_type);
            }
            (false, None) => println!("Not logged in."),
        }
    }

    pub fn cafes(&self, cafes: &[Cafe], viewer: Option<&CurrentUser>) {
        if self.json {
            Self::print_json(cafes);
            return;
        }
        if cafes.is_empty() {
            println!("No cafes yet.");
            return;
        }
        for cafe in cafes {
            println!(
                "{}  {}  {}/{}  {} like(s){}{}",
                cafe.id,
                cafe.name,
                cafe.address.city,
                cafe.address.state,
                cafe.like_count(),
                liked_marker(cafe, viewer),
                if cafe.active { "" } else { "  [inactive]" },
            );
        }
    }

    pub fn cafe(&self, cafe: &Cafe, viewer: Option<&CurrentUser>) {
        if self.json {
            Self::print_json(cafe);
            return;
        }
        let address = &cafe.address;
        println!("{}{}", cafe.name, if cafe.active { "" } else { " [inactive]" });
        println!("  id:       {}", cafe.id);
        if !cafe.description.is_empty() {
            println!("  about:    {}", cafe.description);
        }
        println!(
            "  address:  {}, {} - {}, {}/{} {}",
            address.street, address.number, address.neighborhood, address.city, address.state, address.zip
        );
        println!("  location: {}, {}", cafe.location.latitude, cafe.location.longitude);
        println!("  cnpj:     {}", cafe.cnpj);
        println!("  ticket:   {}", cafe.average_ticket);
        println!("  image:    {}", cafe.display_image());
        println!("  likes:    {}{}", cafe.like_count(), liked_marker(cafe, viewer));
    }

    pub fn address(&self, found: &LookedUpAddress) {
        if self.json {
            Self::print_json(found);
        } else {
            println!(
                "{} - {}, {}/{} {}",
                found.street, found.neighborhood, found.city, found.state, found.zip
            );
        }
    }
}

fn liked_marker(cafe: &Cafe, viewer: Option<&CurrentUser>) -> &'static str {
    if viewer.is_some_and(|user| cafe.is_liked_by(&user.id)) {
        " (liked)"
    } else {
        ""
    }
}
