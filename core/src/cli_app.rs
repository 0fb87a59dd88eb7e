/// Shared CLI implementation for the `llk` binary
///
/// Scripting surface over the same services the TUI uses. The backend is
/// taken from LEADLINK_BASE_URL (or the default localhost), identity from
/// the usual host bridge sources.
use crate::api::ApiClient;
use crate::host::HostContext;
use crate::services::Services;
use crate::types::ClientStatus;
use crate::Config;
use colored::*;
use std::sync::Arc;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let bin = args
        .first()
        .map(|s| s.as_str())
        .unwrap_or("llk")
        .to_string();

    if args.len() < 2 {
        print_usage(&bin);
        return Ok(());
    }

    let command = &args[1];
    let services = build_services()?;

    match command.as_str() {
        "status" => {
            show_status(&services).await?;
        }
        "clients" => {
            let status = args.get(2).map(|s| parse_status(s)).transpose()?;
            list_clients(&services, status).await?;
        }
        "send" => {
            if args.len() < 4 {
                eprintln!("{}", format!("Usage: {} send <client_id> <message>", bin).yellow());
                return Ok(());
            }
            let client_id = args[2].clone();
            let message = args[3..].join(" ");
            send_message(&services, &client_id, &message).await?;
        }
        "attention" => {
            show_attention(&services).await?;
        }
        "unread" => {
            show_unread(&services).await?;
        }
        "search" => {
            if args.len() < 3 {
                eprintln!("{}", format!("Usage: {} search <query>", bin).yellow());
                return Ok(());
            }
            let query = args[2..].join(" ");
            search_messages(&services, &query).await?;
        }
        "tips" => {
            if args.len() < 3 {
                eprintln!("{}", format!("Usage: {} tips <client_id>", bin).yellow());
                return Ok(());
            }
            show_tips(&services, &args[2]).await?;
        }
        _ => {
            eprintln!("{} Unknown command: {}", "✗".red().bold(), command.red());
            print_usage(&bin);
        }
    }

    Ok(())
}

fn build_services() -> anyhow::Result<Arc<Services>> {
    // Config comes from the environment; CLI positional args are commands
    let config = Config::from_args(&["llk".to_string()])
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    let host = Arc::new(HostContext::init(&config));
    let api = Arc::new(ApiClient::new(&config, host)?);
    Ok(Arc::new(Services::new(api)))
}

fn parse_status(s: &str) -> anyhow::Result<ClientStatus> {
    match s {
        "new" => Ok(ClientStatus::New),
        "in_progress" => Ok(ClientStatus::InProgress),
        "closed" => Ok(ClientStatus::Closed),
        other => anyhow::bail!("Unknown status: {} (new|in_progress|closed)", other),
    }
}

fn print_usage(bin: &str) {
    println!("{}", "⚡ LeadLink CLI".bright_cyan().bold());
    println!();
    println!("{}", "Usage:".bright_white().bold());
    println!("  {} <command> [args]", bin.cyan());
    println!();
    println!("{}", "Commands:".bright_white().bold());
    println!(
        "  {}                      Dashboard stats and unread count",
        "status".cyan()
    );
    println!(
        "  {} [status]            List clients (new|in_progress|closed)",
        "clients".cyan()
    );
    println!(
        "  {} <client_id> <text>     Send a reply to a client",
        "send".cyan()
    );
    println!(
        "  {}                   Listings that need review",
        "attention".cyan()
    );
    println!("  {}                      Unread message count", "unread".cyan());
    println!("  {} <query>            Search messages", "search".cyan());
    println!(
        "  {} <client_id>         AI tips for closing the deal",
        "tips".cyan()
    );
    println!();
    println!("{}", "Environment:".bright_white().bold());
    println!("  LEADLINK_BASE_URL     Backend base URL (default http://127.0.0.1:8000)");
    println!("  LEADLINK_INIT_DATA    Identity payload forwarded to the backend");
}

async fn show_status(services: &Services) -> anyhow::Result<()> {
    let stats = services.clients.dashboard_stats().await?;
    let unread = services.messages.unread_count().await?;

    println!(
        "{}",
        "╭─ LeadLink Status ─────────────────────────────────────────────╮".bright_cyan()
    );
    println!(
        "{} {}",
        "│".bright_cyan(),
        format!("New leads:       {}", stats.new_leads.to_string().green()).bright_white()
    );
    println!(
        "{} {}",
        "│".bright_cyan(),
        format!(
            "Need attention:  {}",
            stats.pending_attention.to_string().yellow()
        )
        .bright_white()
    );
    println!(
        "{} {}",
        "│".bright_cyan(),
        format!("Active chats:    {}", stats.active_chats.to_string().cyan()).bright_white()
    );
    println!(
        "{} {}",
        "│".bright_cyan(),
        format!(
            "Closed deals:    {}",
            stats.completed_sales.to_string().green()
        )
        .bright_white()
    );
    println!(
        "{} {}",
        "│".bright_cyan(),
        format!("Unread:          {}", unread.unread_count.to_string().cyan()).bright_white()
    );
    println!(
        "{}",
        "╰───────────────────────────────────────────────────────────────╯".bright_cyan()
    );
    Ok(())
}

async fn list_clients(services: &Services, status: Option<ClientStatus>) -> anyhow::Result<()> {
    let clients = services.clients.list(status, None, None).await?;

    if clients.is_empty() {
        println!("{}", "No clients found".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Clients ({})", clients.len()).bright_cyan().bold()
    );
    println!("{}", "─".repeat(60).dimmed());
    for client in clients {
        let status = match client.status {
            ClientStatus::New => client.status.label().green(),
            ClientStatus::InProgress => client.status.label().yellow(),
            ClientStatus::Closed => client.status.label().dimmed(),
        };
        println!(
            "  {} {} [{}] [{}]",
            client.id.cyan(),
            client.name,
            status,
            client.source.label().blue()
        );
        if let Some(title) = &client.listing_title {
            println!("      {}", title.dimmed());
        }
    }
    Ok(())
}

async fn send_message(services: &Services, client_id: &str, message: &str) -> anyhow::Result<()> {
    let sent = services.messages.respond(client_id, message).await?;
    println!("{} Message sent! ID: {}", "✓".green().bold(), sent.id.cyan());
    Ok(())
}

async fn show_attention(services: &Services) -> anyhow::Result<()> {
    let listings = services.attention.listings().await?;

    if listings.is_empty() {
        println!("{}", "✓ All under control, nothing needs review".green().bold());
        return Ok(());
    }

    println!(
        "{}",
        format!("Needs review ({})", listings.len()).bright_cyan().bold()
    );
    println!("{}", "─".repeat(60).dimmed());
    for listing in listings {
        let title = listing
            .listing_title
            .as_deref()
            .unwrap_or("Untitled listing");
        println!(
            "  {} {} — {}",
            listing.reason.icon(),
            title,
            listing.reason.label().yellow()
        );
        if !listing.details.is_empty() {
            println!("      {}", listing.details.dimmed());
        }
    }
    Ok(())
}

async fn show_unread(services: &Services) -> anyhow::Result<()> {
    let unread = services.messages.unread_count().await?;
    println!(
        "{} unread messages",
        unread.unread_count.to_string().cyan().bold()
    );
    Ok(())
}

async fn show_tips(services: &Services, client_id: &str) -> anyhow::Result<()> {
    let tips = services.ai.close_deal_tips(client_id).await?;
    println!("{}", tips.response.bright_white().bold());
    for tip in tips.suggestions {
        println!("  {} {}", "•".cyan(), tip);
    }
    Ok(())
}

async fn search_messages(services: &Services, query: &str) -> anyhow::Result<()> {
    let messages = services.messages.search(query, None).await?;

    if messages.is_empty() {
        println!("{}", "No messages match".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Matches ({})", messages.len()).bright_cyan().bold()
    );
    println!("{}", "─".repeat(60).dimmed());
    for message in messages {
        println!(
            "  {} [{}] {}",
            message.timestamp.format("%Y-%m-%d %H:%M").to_string().dimmed(),
            message.client_id.cyan(),
            message.content
        );
    }
    Ok(())
}
