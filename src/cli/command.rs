use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rusty-agenda", version, about = "Personal contact book")]
pub struct Cli {
    /// Contact file to use instead of the detected location
    #[arg(long, global = true, env = "AGENDA_FILE")]
    pub file: Option<String>,

    /// Runs the interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommand and their flags
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a new contact (needs a phone or an email)
    Add {
        /// Full name
        #[arg(long)]
        name: String,

        /// Name you like to call them
        #[arg(long)]
        nickname: Option<String>,

        /// Phone number, at least 10 digits (spaces and hyphens allowed)
        #[arg(long)]
        phone: Option<String>,

        /// Email address
        #[arg(long)]
        email: Option<String>,

        /// Web page, e.g. example.com
        #[arg(long)]
        website: Option<String>,

        /// Birthday, free text
        #[arg(long)]
        birthday: Option<String>,

        /// Category used to group contacts in stats (family, work, gym)
        #[arg(long)]
        category: Option<String>,

        /// Free note
        #[arg(long)]
        note: Option<String>,
    },
    /// List contacts with their numbers
    List,
    /// Search name, phone and email
    Search {
        /// Text to look for
        query: String,
    },
    /// Edit the contact at a listed number
    /// followed by optional arguments of as many field you wish to update
    Edit {
        /// Number shown by `list`
        position: String,

        /// Update name
        #[arg(long)]
        name: Option<String>,

        /// Update phone number
        #[arg(long)]
        phone: Option<String>,

        /// Update email address
        #[arg(long)]
        email: Option<String>,

        /// Update web page
        #[arg(long)]
        website: Option<String>,
    },
    /// Delete the contact at a listed number
    Delete {
        /// Number shown by `list`
        position: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show totals and categories
    Stats,
    /// Interactive menu
    Menu,
}
