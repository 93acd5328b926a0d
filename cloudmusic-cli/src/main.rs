use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use cloudmusic_api::types::Music;
use cloudmusic_api::{
    DEFAULT_COUNTRY_CODE, DEFAULT_QR_INTERVAL, Login, Music163Api, PhoneCredential, SessionToken,
    Transport,
};
use qrcode::QrCode;
use qrcode::render::unicode::Dense1x2;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cloudmusic", version, about = "Netease Cloud Music command-line client")]
struct Cli {
    /// Session cookie printed by `login`
    #[arg(long, global = true, env = "CLOUDMUSIC_COOKIE", hide_env_values = true)]
    cookie: Option<String>,
    /// Send X-Real-IP / X-Forwarded-For with every request
    #[arg(long, global = true, value_name = "IP")]
    real_ip: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and print the session cookie
    Login {
        #[command(subcommand)]
        method: LoginMethod,
    },
    /// Show the account behind the cookie
    Me,
    /// Show raw login status
    Status,
    /// Extend the session
    Refresh,
    /// Invalidate the cookie on the server
    Logout,
    /// Search the catalogue
    Search {
        /// Search keyword
        keyword: String,
        /// Search type
        #[arg(short = 't', long, default_value = "track")]
        r#type: SearchKind,
        /// Page, starting at 0
        #[arg(short, long, default_value = "0")]
        page: u32,
        /// Results per page
        #[arg(short, long, default_value = "20")]
        limit: u32,
    },
    /// Show song details
    Song {
        /// Song IDs
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Show a playlist with all of its tracks
    Playlist {
        /// Playlist ID
        playlist_id: u64,
    },
}

#[derive(Subcommand)]
enum LoginMethod {
    /// Email and password
    Email {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Phone number with a password, or an SMS code when no password is given
    Phone {
        phone: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long, default_value = DEFAULT_COUNTRY_CODE)]
        country_code: String,
    },
    /// Scan a QR code with the mobile app
    Qr,
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchKind {
    Track,
    Album,
    Artist,
    Playlist,
    User,
    Mv,
    Dj,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let transport = Arc::new(Transport::new().context("failed to build HTTP client")?);
    if let Some(ip) = &cli.real_ip {
        transport.set_real_ip(ip.as_str());
    }
    let token = cli.cookie.map(SessionToken::from);

    match cli.command {
        Command::Login { method } => cmd_login(transport, method).await,
        Command::Me => cmd_me(&client(transport, token)).await,
        Command::Status => {
            let login = Login::with_token(transport, require(token)?);
            print_json(&login.login_status().await.context("status request failed")?)
        }
        Command::Refresh => {
            let login = Login::with_token(transport, require(token)?);
            print_json(&login.refresh_login().await.context("refresh failed")?)
        }
        Command::Logout => {
            let login = Login::with_token(transport, require(token)?);
            login.logout().await.context("logout failed")?;
            println!("Logged out.");
            Ok(())
        }
        Command::Search {
            keyword,
            r#type,
            page,
            limit,
        } => cmd_search(&client(transport, token), &keyword, r#type, page, limit).await,
        Command::Song { ids } => cmd_song(&client(transport, token), &ids).await,
        Command::Playlist { playlist_id } => {
            cmd_playlist(&client(transport, token), playlist_id).await
        }
    }
}

fn client(transport: Arc<Transport>, token: Option<SessionToken>) -> Music163Api {
    Music163Api::with_transport(transport, token)
}

fn require(token: Option<SessionToken>) -> Result<SessionToken> {
    token.context("no session: pass --cookie or set CLOUDMUSIC_COOKIE")
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn artists(m: &Music) -> String {
    m.artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ── login ──

async fn cmd_login(transport: Arc<Transport>, method: LoginMethod) -> Result<()> {
    let mut login = Login::with_transport(transport);

    let (token, api) = match method {
        LoginMethod::Email { email, password } => login
            .email(&email, &password)
            .await
            .context("email login failed")?,
        LoginMethod::Phone {
            phone,
            password: Some(password),
            country_code,
        } => login
            .cellphone(&phone, PhoneCredential::Password(&password), &country_code)
            .await
            .context("phone login failed")?,
        LoginMethod::Phone {
            phone,
            password: None,
            country_code,
        } => {
            login
                .send_captcha(&phone, &country_code)
                .await
                .context("failed to send SMS code")?;
            let code = prompt("SMS code: ")?;
            login
                .cellphone(&phone, PhoneCredential::Captcha(&code), &country_code)
                .await
                .context("phone login failed")?
        }
        LoginMethod::Qr => {
            let (key, url) = login.qr_key().await.context("failed to get QR ticket")?;
            let code = QrCode::new(url.as_bytes()).context("failed to encode QR code")?;
            println!("{}", code.render::<Dense1x2>().quiet_zone(true).build());
            println!("Scan with the mobile app, or open: {url}");
            let (token, api) = login
                .qr(&key, DEFAULT_QR_INTERVAL)
                .await
                .context("QR login failed")?;
            if token.is_empty() {
                bail!("QR code expired, run `login qr` again");
            }
            (token, api)
        }
    };

    match api.my().await {
        Ok(my) => eprintln!("Logged in as: {} (id={})", my.profile.nickname, my.account_id),
        Err(e) => tracing::warn!("logged in, but account lookup failed: {e}"),
    }
    println!("{token}");
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim().to_owned();
    if line.is_empty() {
        bail!("no input");
    }
    Ok(line)
}

// ── me ──

async fn cmd_me(api: &Music163Api) -> Result<()> {
    let my = api
        .my()
        .await
        .context("not logged in or the cookie has expired")?;
    let p = &my.profile;
    println!("User:      {} (id={})", p.nickname, my.account_id);
    if let Some(name) = &my.user_name {
        println!("Account:   {name}");
    }
    println!("VIP type:  {}", my.vip_type);
    if let Some(level) = p.level {
        println!("Level:     {level}");
    }
    println!("Follows:   {} / followers {}", p.follows, p.followeds);
    if let Some(url) = &p.avatar_url {
        println!("Avatar:    {url}");
    }
    Ok(())
}

// ── search ──

async fn cmd_search(
    api: &Music163Api,
    keyword: &str,
    kind: SearchKind,
    page: u32,
    limit: u32,
) -> Result<()> {
    let (total, rows): (u64, Vec<String>) = match kind {
        SearchKind::Track => {
            let r = api.search_music(keyword, page, limit).await?;
            let rows = r
                .items
                .iter()
                .map(|m| format!("[{}] {} - {} ({})", m.id, artists(m), m.name, m.album.name))
                .collect();
            (r.total, rows)
        }
        SearchKind::Album => {
            let r = api.search_album(keyword, page, limit).await?;
            let rows = r
                .items
                .iter()
                .map(|a| format!("[{}] {} ({} songs)", a.id, a.name, a.size))
                .collect();
            (r.total, rows)
        }
        SearchKind::Artist => {
            let r = api.search_artist(keyword, page, limit).await?;
            let rows = r.items.iter().map(|a| format!("[{}] {}", a.id, a.name)).collect();
            (r.total, rows)
        }
        SearchKind::Playlist => {
            let r = api.search_playlist(keyword, page, limit).await?;
            let rows = r
                .items
                .iter()
                .map(|p| format!("[{}] {} ({} tracks)", p.id, p.name, p.track_count))
                .collect();
            (r.total, rows)
        }
        SearchKind::User => {
            let r = api.search_user(keyword, page, limit).await?;
            let rows = r.items.iter().map(|u| format!("[{}] {}", u.id, u.nickname)).collect();
            (r.total, rows)
        }
        SearchKind::Mv => {
            let r = api.search_mv(keyword, page, limit).await?;
            let rows = r
                .items
                .iter()
                .map(|m| format!("[{}] {} - {}", m.id, m.artist_name, m.name))
                .collect();
            (r.total, rows)
        }
        SearchKind::Dj => {
            let r = api.search_dj(keyword, page, limit).await?;
            let rows = r
                .items
                .iter()
                .map(|d| format!("[{}] {} ({} programs)", d.id, d.name, d.program_count))
                .collect();
            (r.total, rows)
        }
    };

    println!("Total: {total}\n");
    for row in rows {
        println!("  {row}");
    }
    Ok(())
}

// ── song / playlist ──

async fn cmd_song(api: &Music163Api, ids: &[u64]) -> Result<()> {
    let songs = api.musics(ids).await.context("song detail failed")?;
    if songs.is_empty() {
        bail!("no songs found");
    }
    for (i, m) in songs.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("Song:     {} (id={})", m.name, m.id);
        if !m.alias.is_empty() {
            println!("Alias:    {}", m.alias.join(" / "));
        }
        println!("Artists:  {}", artists(m));
        println!("Album:    {} (id={})", m.album.name, m.album.id);
        println!(
            "Duration: {}:{:02}",
            m.duration_ms / 60000,
            (m.duration_ms / 1000) % 60
        );
        if let Some(mv) = m.mv_id {
            println!("MV:       {mv}");
        }
    }
    Ok(())
}

async fn cmd_playlist(api: &Music163Api, playlist_id: u64) -> Result<()> {
    let p = api
        .playlist(playlist_id)
        .await
        .context("playlist detail failed")?;
    println!("Playlist: {} (id={})", p.name, p.id);
    println!("Tracks:   {}", p.track_count);
    if let Some(desc) = &p.description {
        println!("Desc:     {desc}");
    }
    if let Some(creator) = &p.creator {
        println!("Creator:  {} (id={})", creator.name, creator.id);
    }
    if !p.tracks.is_empty() {
        println!();
        for t in &p.tracks {
            println!("  [{}] {} - {}", t.id, artists(t), t.name);
        }
    }
    Ok(())
}
