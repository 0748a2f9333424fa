//! CLI command definitions for dadderup.

use std::path::PathBuf;

use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default config file and create the admin database
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Manage daily challenges
    Challenge {
        #[command(subcommand)]
        command: ChallengeCommands,
    },

    /// Manage badge definitions
    Badge {
        #[command(subcommand)]
        command: BadgeCommands,
    },

    /// Manage plan cards on the plans page
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },

    /// Inspect reaction catalogs
    Reaction {
        #[command(subcommand)]
        command: ReactionCommands,
    },

    /// Show or change config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Print the dashboard summary on every refresh until Ctrl-C
    Watch {
        /// Seconds between refreshes (defaults to settings.refresh_interval_secs)
        #[arg(long, short = 'i')]
        interval: Option<u64>,
    },
}

/// Editable challenge fields shared by `add` and `edit`
#[derive(Args, Debug, Default, Clone)]
pub struct ChallengeFields {
    /// Day to place the challenge on (1-based)
    #[arg(long, allow_negative_numbers = true)]
    pub day: Option<i64>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub tip: Option<String>,

    /// YouTube link; pass an empty string to clear
    #[arg(long)]
    pub video: Option<String>,

    /// Points for one channel, e.g. `--points video=20` (repeatable)
    #[arg(long = "points", value_name = "CHANNEL=N", allow_negative_numbers = true)]
    pub points: Vec<String>,

    /// Enabled submission channels, e.g. `--types text,audio,video`
    #[arg(long, value_delimiter = ',')]
    pub types: Option<Vec<String>>,

    /// Associated badge id (repeatable)
    #[arg(long = "badge")]
    pub badges: Vec<String>,

    /// Associated reaction id (repeatable)
    #[arg(long = "reaction")]
    pub reactions: Vec<String>,

    /// Associated parent reaction id (repeatable)
    #[arg(long = "parent-reaction")]
    pub parent_reactions: Vec<String>,

    /// Drop existing badge/reaction associations before adding the given ones
    #[arg(long)]
    pub clear_associations: bool,

    /// general, product or none
    #[arg(long)]
    pub shop_type: Option<String>,

    /// Show the shop button (true/false)
    #[arg(long)]
    pub shop_button: Option<bool>,

    #[arg(long)]
    pub shop_product_id: Option<String>,

    #[arg(long)]
    pub shop_url: Option<String>,

    /// Subscription product that unlocks the challenge; empty makes it public
    #[arg(long)]
    pub subscription_product_id: Option<String>,
}

#[derive(Subcommand)]
pub enum ChallengeCommands {
    /// List challenges in day order
    List {
        /// Print JSON instead of human output
        #[arg(long)]
        json: bool,
        /// Include removed (inactive) challenges
        #[arg(long)]
        all: bool,
    },
    /// Show one challenge with its resolved badges and reactions
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a challenge
    Add {
        title: String,
        #[command(flatten)]
        fields: ChallengeFields,
    },
    /// Edit a challenge
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: ChallengeFields,
    },
    /// Remove a challenge from the active set
    Remove { id: String },
    /// Set the full day order by listing every challenge id
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Move the challenge on day FROM to day TO
    Move { from: u32, to: u32 },
    /// Create challenges from a YAML or JSON list of forms (all or nothing)
    Import {
        file: PathBuf,
        /// Validate only, write nothing
        #[arg(long)]
        dry_run: bool,
    },
}

/// Editable badge fields shared by `add` and `edit`
#[derive(Args, Debug, Default, Clone)]
pub struct BadgeFields {
    #[arg(long)]
    pub description: Option<String>,

    /// Short emoji
    #[arg(long)]
    pub icon: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub points: Option<i64>,

    /// Award when this challenge is completed (repeatable)
    #[arg(long = "challenge", conflicts_with = "action")]
    pub challenges: Vec<String>,

    /// Award on a catalog action (see `dadderup badge triggers`)
    #[arg(long)]
    pub action: Option<String>,
}

#[derive(Subcommand)]
pub enum BadgeCommands {
    /// List badge definitions
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one badge
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Create a badge
    Add {
        name: String,
        #[command(flatten)]
        fields: BadgeFields,
    },
    /// Edit a badge
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: BadgeFields,
    },
    /// Delete a badge
    Remove { id: String },
    /// List the action trigger catalog
    Triggers {
        #[arg(long)]
        json: bool,
    },
    /// Find badges by award condition or required challenge
    Find {
        /// e.g. trigger_streak_milestone
        #[arg(long, required_unless_present = "challenge")]
        condition: Option<String>,
        #[arg(long)]
        challenge: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// List plan configurations, or rendered cards when a product file is given
    List {
        /// YAML or JSON list of products
        #[arg(long)]
        products: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Create or update display overrides for a product (`source:product_id`)
    Set {
        key: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Feature line (repeatable); replaces the product's features
        #[arg(long = "feature")]
        features: Vec<String>,
    },
    /// Add default configurations for every product in a file
    Sync { products: PathBuf },
    /// Delete a product's configuration
    Remove { key: String },
    /// Show a product card on the plans page
    Show { key: String },
    /// Hide a product card from the plans page
    Hide { key: String },
    /// Set the full card order by listing every key
    Reorder {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Move the card at position FROM to TO (0-based)
    Move { from: usize, to: usize },
}

#[derive(Subcommand)]
pub enum ReactionCommands {
    /// List active reactions in display order
    List {
        /// Use the parent reaction catalog
        #[arg(long)]
        parent: bool,
        #[arg(long)]
        json: bool,
    },
    /// Load catalog entries from a YAML or JSON file
    Import {
        file: PathBuf,
        #[arg(long)]
        parent: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set a value, e.g. `settings.challenges.max_day_order 7` (`none` clears it)
    Set { key: String, value: String },
}
