mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use sipeka_client::commands::{auth, catalog, documents, notifications, profile, submissions};
use sipeka_client::{AppState, ClientConfig, ClientError};
use sipeka_shared::protocol::{ChangePasswordRequest, ProfileUpdate, RegisterRequest};
use sipeka_shared::submission::{SubmissionDetail, SubmissionSummary};
use sipeka_shared::{Applicant, FormState, LetterType, LocalFile, SubmissionId};

use crate::cli::{ApplicantArgs, Cli, Command, FieldArgs, ProfileArgs};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    sipeka_client::init_tracing();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env();
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url).context("invalid --api-url")?;
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }

    let state = AppState::open(config).context("cannot open the local session store")?;

    match run(&state, cli.command, cli.json).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}", e.user_message());
            Ok(ExitCode::from(if e.is_auth() { 2 } else { 1 }))
        }
    }
}

async fn run(state: &AppState, command: Command, json: bool) -> Result<(), ClientError> {
    match command {
        Command::Login { email, password } => {
            let response = auth::login(state, &email, &password).await?;
            println!("{}", response.message.as_deref().unwrap_or("Login berhasil"));
        }
        Command::Register {
            name,
            email,
            password,
            password_confirmation,
        } => {
            let request = RegisterRequest {
                name,
                email,
                password,
                password_confirmation,
            };
            let response = auth::register(state, &request).await?;
            println!("{}", response.message.as_deref().unwrap_or("Registrasi berhasil"));
        }
        Command::ForgotPassword { email } => {
            let response = auth::forgot_password(state, &email).await?;
            println!(
                "{}",
                response.message.as_deref().unwrap_or("Link reset password telah dikirim")
            );
        }
        Command::ChangePassword {
            current,
            new,
            confirmation,
        } => {
            let request = ChangePasswordRequest {
                password: current,
                new_password: new,
                new_password_confirmation: confirmation,
            };
            let response = auth::change_password(state, &request).await?;
            println!("{}", response.message.as_deref().unwrap_or("Password berhasil diubah"));
        }
        Command::Logout => {
            auth::logout(state).await?;
            println!("Anda telah logout");
        }
        Command::Whoami => {
            let user = profile::current_user(state).await?;
            if json {
                return print_json(&user);
            }
            println!("{} <{}>", user.applicant.name, user.applicant.email);
            println!("NIK    : {}", user.applicant.nik);
            println!("Alamat : {}", user.applicant.address);
            println!("Status : {}", if user.is_active { "aktif" } else { "belum aktif" });
        }
        Command::UpdateProfile(args) => update_profile(state, args).await?,
        Command::LetterTypes => {
            for letter_type in LetterType::ALL {
                let (id, slug) = (letter_type.id(), letter_type.slug());
                println!("{id}  {slug:<22} {}", letter_type.title());
            }
        }
        Command::Fields { letter_type } => {
            let fields = catalog::load_catalog(state, letter_type).await?;
            if json {
                return print_json(&fields);
            }
            for field in &fields {
                let required = if field.required { "*" } else { " " };
                print!("{required} {:<28} {}", field.name, field.kind);
                if !field.options.is_empty() {
                    print!(" [{}]", field.options.join(", "));
                }
                println!();
            }
        }
        Command::Submit {
            letter_type,
            values,
            applicant,
            nik,
        } => {
            let mut form = catalog::load_or_empty(state, letter_type).await;
            if form.is_empty() {
                return Err(ClientError::CatalogUnavailable {
                    letter_type: letter_type.id(),
                    reason: "no fields".into(),
                });
            }
            fill_form(&mut form, &values)?;

            let profile = profile::current_user(state).await?;
            let mut identity = profile.applicant;
            apply_overrides(&mut identity, &applicant);
            if let Some(nik) = nik {
                identity.nik = nik;
            }

            let outcome = submissions::submit(state, letter_type, &identity, &form).await?;
            if json {
                return print_json(&outcome);
            }
            let message = outcome.message.as_deref();
            println!("{}", message.unwrap_or("Pengajuan berhasil dikirim"));
            if let Some(id) = outcome.id {
                println!("Nomor pengajuan: {id}");
            }
        }
        Command::History { latest } => {
            let rows = if latest {
                submissions::latest_submissions(state).await?
            } else {
                submissions::list_submissions(state).await?
            };
            // Superseded by a newer refresh; nothing current to print.
            let Some(rows) = rows else {
                return Ok(());
            };
            if json {
                return print_json(&rows);
            }
            if rows.is_empty() {
                println!("Belum ada pengajuan");
            }
            for row in &rows {
                print_summary(row);
            }
        }
        Command::Show { id } => {
            let detail = submissions::submission_detail(state, SubmissionId(id)).await?;
            if json {
                return print_json(&detail);
            }
            print_detail(state, &detail);
        }
        Command::Delete { id } => {
            let detail = submissions::submission_detail(state, SubmissionId(id)).await?;
            let response = submissions::delete_submission(state, detail.id, &detail.status).await?;
            println!("{}", response.message.as_deref().unwrap_or("Pengajuan dihapus"));
        }
        Command::Resubmit {
            id,
            values,
            applicant,
        } => {
            let mut draft = submissions::open_resubmission(state, SubmissionId(id)).await?;
            if let Some(reason) = &draft.rejection_reason {
                println!("Alasan penolakan: {reason}");
            }
            fill_form(&mut draft.form, &values)?;
            apply_overrides(&mut draft.applicant, &applicant);

            let response = submissions::resubmit(state, &draft).await?;
            println!("{}", response.message.as_deref().unwrap_or("Pengajuan berhasil diperbarui"));
        }
        Command::Download { id, dir } => {
            let detail = submissions::submission_detail(state, SubmissionId(id)).await?;
            let dir = match dir {
                Some(dir) => dir,
                None => state.config().resolve_download_dir()?,
            };
            let path = documents::download_letter(state, detail.id, &detail.status, &dir).await?;
            println!("{}", path.display());
        }
        Command::Notifications => {
            let items = notifications::notifications(state).await?;
            if json {
                return print_json(&items);
            }
            if items.is_empty() {
                println!("Tidak ada notifikasi");
            }
            for item in &items {
                let marker = if item.is_read() { " " } else { "•" };
                println!("{marker} {}  {}  ({})", item.id, item.data.message, item.created_at);
            }
        }
        Command::ReadNotification { id } => {
            notifications::mark_notification_read(state, &id).await?;
        }
    }
    Ok(())
}

async fn update_profile(state: &AppState, args: ProfileArgs) -> Result<(), ClientError> {
    let current = profile::current_user(state).await?;
    let mut update = ProfileUpdate::from_profile(&current);

    let overrides = [
        (&mut update.name, args.name),
        (&mut update.email, args.email),
        (&mut update.nik, args.nik),
        (&mut update.alamat, args.alamat),
        (&mut update.desa, args.desa),
        (&mut update.rt, args.rt),
        (&mut update.rw, args.rw),
        (&mut update.kode_pos, args.kode_pos),
        (&mut update.dusun, args.dusun),
        (&mut update.nomor_hp, args.nomor_hp),
        (&mut update.pekerjaan, args.pekerjaan),
        (&mut update.tempat_lahir, args.tempat_lahir),
        (&mut update.tgl_lahir, args.tgl_lahir),
    ];
    for (slot, value) in overrides {
        if value.is_some() {
            *slot = value;
        }
    }

    let ktp = args.foto_ktp.map(LocalFile::from_path);
    let kk = args.foto_kk.map(LocalFile::from_path);
    let response = profile::update_profile(state, &update, ktp.as_ref(), kk.as_ref()).await?;
    println!("{}", response.message.as_deref().unwrap_or("Profil berhasil diperbarui"));
    Ok(())
}

fn fill_form(form: &mut FormState, values: &FieldArgs) -> Result<(), ClientError> {
    for (name, value) in &values.set {
        form.set_by_name(name, value)?;
    }
    Ok(())
}

fn apply_overrides(applicant: &mut Applicant, args: &ApplicantArgs) {
    if let Some(name) = &args.name {
        applicant.name = name.clone();
    }
    if let Some(email) = &args.email {
        applicant.email = email.clone();
    }
    if let Some(alamat) = &args.alamat {
        applicant.address = alamat.clone();
    }
}

fn print_summary(row: &SubmissionSummary) {
    let letter = row
        .letter_type
        .as_ref()
        .map(|t| t.name.as_str())
        .unwrap_or("-");
    let date = row
        .created_at_utc()
        .map(|d| d.format("%d-%m-%Y").to_string())
        .unwrap_or_default();
    println!("#{:<5} {:<10} {:<32} {}", row.id.0, row.status, letter, date);
}

fn print_detail(state: &AppState, detail: &SubmissionDetail) {
    let letter = detail
        .letter_type
        .as_ref()
        .map(|t| t.name.as_str())
        .unwrap_or("-");
    println!("Pengajuan #{}  {}", detail.id, letter);
    println!("Status   : {}", detail.status);
    if let Some(reason) = detail.active_rejection_reason() {
        println!("Alasan   : {reason}");
    }
    println!("Pemohon  : {} ({})", detail.applicant.name, detail.applicant.nik);
    println!();
    for value in &detail.values {
        match documents::stored_file_url(state, value) {
            Some(url) => println!("{:<28} {}", value.field.name, url),
            None => println!("{:<28} {}", value.field.name, value.value),
        }
    }

    let actions = detail.actions();
    let mut allowed = Vec::new();
    if actions.edit {
        allowed.push("resubmit");
    }
    if actions.delete {
        allowed.push("delete");
    }
    if actions.download {
        allowed.push("download");
    }
    if !allowed.is_empty() {
        println!();
        println!("Tindakan : {}", allowed.join(", "));
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ClientError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
