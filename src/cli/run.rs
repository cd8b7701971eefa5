use crate::{
    cli::{
        Console, describe_cleared, describe_load, describe_save, display_contacts,
        display_stats, display_summary,
        menu::Menu,
    },
    prelude::{
        AppError, Confirmation, ContactChanges, ContactDraft, ContactManager, HostProbe,
        JsonStorage, LoadOutcome, SaveStatus,
        command::{Cli, Commands},
        parse_position, resolve_storage_path,
    },
};
use clap::Parser;
use dotenv::dotenv;
use std::io;

pub fn run_app() -> Result<(), AppError> {
    dotenv().ok();
    let cli = Cli::parse();

    let resolved = resolve_storage_path(cli.file.as_deref(), &HostProbe::detect());
    let (mut storage, outcome) = ContactManager::open(Box::new(JsonStorage::new(&resolved.path)));

    let command = cli.command.unwrap_or(Commands::Menu);

    if let LoadOutcome::Degraded(_) = outcome
        && !matches!(command, Commands::Menu)
    {
        eprintln!("{}", describe_load(&outcome));
    }

    match command {
        Commands::Add {
            name,
            nickname,
            phone,
            email,
            website,
            birthday,
            category,
            note,
        } => {
            let created = storage.create(ContactDraft {
                name,
                nickname: nickname.unwrap_or_default(),
                phone: phone.unwrap_or_default(),
                email: email.unwrap_or_default(),
                website: website.unwrap_or_default(),
                birthday: birthday.unwrap_or_default(),
                category: category.unwrap_or_default(),
                note: note.unwrap_or_default(),
            })?;

            for field in &created.cleared {
                eprintln!("{}", describe_cleared(field));
            }
            report_save(&created.save, &storage.location());

            println!("Contact added successfully as #{}", created.position);
            Ok(())
        }

        // Listing contacts
        Commands::List => {
            if storage.is_empty() {
                println!("No contacts yet");
                return Ok(());
            }
            println!("{}", display_contacts(storage.iter()));
            Ok(())
        }

        // Search for a contact
        Commands::Search { query } => {
            let found = storage.find(&query);

            if found.is_empty() {
                println!("No contacts found for '{}'", query.trim());
                return Ok(());
            }

            println!("{} contact(s) found:", found.len());
            for contact in found {
                println!("   - {}", display_summary(contact));
            }
            Ok(())
        }

        // Edit Contact
        Commands::Edit {
            position,
            name,
            phone,
            email,
            website,
        } => {
            let position = parse_position(&position)?;
            let updated = storage.update(
                position,
                ContactChanges {
                    name,
                    phone,
                    email,
                    website,
                },
            )?;

            for field in &updated.ignored {
                eprintln!("{}", describe_cleared(field));
            }
            report_save(&updated.save, &storage.location());

            println!("Contact updated successfully");
            Ok(())
        }

        // Delete Contact
        Commands::Delete { position, yes } => {
            let position = parse_position(&position)?;
            let name = storage.get(position)?.name.clone();

            let confirmation = if yes {
                Confirmation::Yes
            } else {
                let mut console = Console::new(io::stdin().lock(), io::stdout());
                Confirmation::from_reply(&console.confirm_action(&format!("delete {}", name))?)
            };

            match storage.delete(position, confirmation) {
                Ok(deleted) => {
                    report_save(&deleted.save, &storage.location());
                    println!("Contact deleted successfully");
                    Ok(())
                }
                Err(AppError::Cancelled) => {
                    println!("{}", AppError::Cancelled);
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }

        Commands::Stats => {
            if storage.is_empty() {
                println!("No contacts yet");
                return Ok(());
            }
            println!("{}", display_stats(&storage.stats()));
            Ok(())
        }

        Commands::Menu => {
            println!("\n--- Welcome to your contact book ---");
            println!("Storage: {} ({})", resolved.path.display(), resolved.location);
            println!("{}", describe_load(&outcome));

            let console = Console::new(io::stdin().lock(), io::stdout());
            Menu::new(&mut storage, console).run()
        }
    }
}

fn report_save(status: &SaveStatus, location: &str) {
    match status {
        SaveStatus::Saved(_) => log::info!("{}", describe_save(status, location)),
        SaveStatus::Failed(_) => eprintln!("{}", describe_save(status, location)),
    }
}
