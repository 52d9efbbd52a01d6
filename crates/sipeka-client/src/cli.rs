use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sipeka_shared::constants::SERVICE_NAME;
use sipeka_shared::LetterType;

#[derive(Parser, Debug)]
#[command(name = "sipeka", version, about = SERVICE_NAME)]
pub struct Cli {
    /// REST base URL of the SiPeka backend
    #[arg(long, global = true, env = "SIPEKA_API_URL")]
    pub api_url: Option<String>,

    /// Directory holding the local database
    #[arg(long, global = true, env = "SIPEKA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and remember the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SIPEKA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        password_confirmation: String,
    },

    /// Request a password reset email
    ForgotPassword {
        #[arg(long)]
        email: String,
    },

    /// Change the password of the logged-in account
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirmation: String,
    },

    /// Log out and forget the session token
    Logout,

    /// Show the logged-in user's profile
    Whoami,

    /// Update profile fields and photos
    UpdateProfile(ProfileArgs),

    /// List the letter types on offer
    LetterTypes,

    /// Show the form fields of a letter type
    Fields {
        /// Letter type id or slug
        letter_type: LetterType,
    },

    /// Submit a new letter request
    Submit {
        /// Letter type id or slug
        letter_type: LetterType,
        #[command(flatten)]
        values: FieldArgs,
        #[command(flatten)]
        applicant: ApplicantArgs,
        /// NIK, when it differs from the profile
        #[arg(long)]
        nik: Option<String>,
    },

    /// List submitted letter requests
    History {
        /// Only the most recent requests
        #[arg(long)]
        latest: bool,
    },

    /// Show one letter request
    Show { id: i64 },

    /// Delete a letter request
    Delete { id: i64 },

    /// Edit and resend a rejected letter request
    Resubmit {
        id: i64,
        #[command(flatten)]
        values: FieldArgs,
        #[command(flatten)]
        applicant: ApplicantArgs,
    },

    /// Download the letter of a completed request
    Download {
        id: i64,
        /// Target directory
        #[arg(long, env = "SIPEKA_DOWNLOAD_DIR")]
        dir: Option<PathBuf>,
    },

    /// List notifications, unread first
    Notifications,

    /// Mark a notification as read
    ReadNotification { id: String },
}

#[derive(Args, Debug)]
pub struct FieldArgs {
    /// Field value as NAME=VALUE; file fields take a path. Repeatable.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct ApplicantArgs {
    /// Applicant name, when it differs from the profile
    #[arg(long)]
    pub name: Option<String>,
    /// Applicant email, when it differs from the profile
    #[arg(long)]
    pub email: Option<String>,
    /// Applicant address, when it differs from the profile
    #[arg(long)]
    pub alamat: Option<String>,
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub nik: Option<String>,
    #[arg(long)]
    pub alamat: Option<String>,
    #[arg(long)]
    pub desa: Option<String>,
    #[arg(long)]
    pub rt: Option<String>,
    #[arg(long)]
    pub rw: Option<String>,
    #[arg(long)]
    pub kode_pos: Option<String>,
    #[arg(long)]
    pub dusun: Option<String>,
    #[arg(long)]
    pub nomor_hp: Option<String>,
    #[arg(long)]
    pub pekerjaan: Option<String>,
    #[arg(long)]
    pub tempat_lahir: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub tgl_lahir: Option<String>,
    /// Photo of the identity card
    #[arg(long)]
    pub foto_ktp: Option<PathBuf>,
    /// Photo of the family card
    #[arg(long)]
    pub foto_kk: Option<PathBuf>,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn submit_accepts_slug_and_repeated_values() {
        let cli = Cli::try_parse_from([
            "sipeka",
            "submit",
            "dispen-nikah",
            "--set",
            "Nama Calon=Budi",
            "--set",
            "Foto KTP=/tmp/ktp.jpg",
        ])
        .unwrap();
        match cli.command {
            Command::Submit {
                letter_type, values, ..
            } => {
                assert_eq!(letter_type, LetterType::DispenNikah);
                assert_eq!(values.set[0], ("Nama Calon".to_string(), "Budi".to_string()));
                assert_eq!(values.set.len(), 2);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn assignment_needs_a_name() {
        assert!(parse_assignment("=x").is_err());
        assert!(parse_assignment("novalue").is_err());
        assert_eq!(parse_assignment("a=b=c").unwrap(), ("a".into(), "b=c".into()));
    }
}
