//! Discord gateway handler: channel provisioning and wallet registration.
//!
//! Two entry points for users: the onboarding button in the start
//! channel creates a private trading channel, and `!setwallet` inside
//! that channel registers the wallet to watch.

use crate::config::BotConfig;
use crate::watcher::WatcherCommand;
use serenity::all::{
    ButtonStyle, ChannelId, ChannelType, Context, CreateActionRow, CreateButton, CreateChannel,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, EventHandler,
    GuildId, Interaction, Message, PermissionOverwrite, PermissionOverwriteType, Permissions,
    Ready, RoleId, User,
};
use tokio::sync::mpsc;

pub const CREATE_CHANNEL_BUTTON: &str = "create_private_channel";
const SETWALLET_PREFIX: &str = "!setwallet";

pub struct Handler {
    pub config: BotConfig,
    pub commands: mpsc::UnboundedSender<WatcherCommand>,
}

#[serenity::async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!("Discord: Bot connected as {}", ready.user.name);

        let button = CreateButton::new(CREATE_CHANNEL_BUTTON)
            .label("Create my trading channel")
            .style(ButtonStyle::Primary);
        let message = CreateMessage::new()
            .content("Press the button below and I will set up a private channel for your transfer alerts.")
            .components(vec![CreateActionRow::Buttons(vec![button])]);

        let start_channel = ChannelId::new(self.config.start_channel_id);
        if let Err(e) = start_channel.send_message(&ctx.http, message).await {
            log::error!("Discord: Failed to post the onboarding button: {}", e);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Component(component) = interaction else {
            return;
        };
        if component.data.custom_id != CREATE_CHANNEL_BUTTON {
            return;
        }

        log::info!(
            "Discord: Private channel requested by {} ({})",
            component.user.name,
            component.user.id
        );

        let content = match provision_channel(&ctx, &self.config, &component.user).await {
            Ok(channel_id) => format!("Your private channel is ready: <#{}>", channel_id),
            Err(e) => {
                log::error!("Discord: Channel provisioning failed: {}", e);
                format!("Could not create your channel: {}", e)
            }
        };

        let reply = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(true),
        );
        if let Err(e) = component.create_response(&ctx.http, reply).await {
            log::error!("Discord: Failed to reply to interaction: {}", e);
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        // Ignore messages from bots (including ourselves)
        if msg.author.bot {
            return;
        }
        let Some(rest) = msg.content.strip_prefix(SETWALLET_PREFIX) else {
            return;
        };
        let address = rest.trim();

        if !is_valid_address(address) {
            let hint = "Invalid address format. Please provide an Ethereum-style address \
                starting with `0x`.\n\nExample: `!setwallet 0x1234...abcd`";
            if let Err(e) = msg.channel_id.say(&ctx.http, hint).await {
                log::error!("Discord: Failed to send validation reply: {}", e);
            }
            return;
        }

        let command = WatcherCommand::RegisterWallet {
            user_id: msg.author.id.get(),
            channel_id: msg.channel_id.get(),
            wallet_address: address.to_string(),
        };
        if self.commands.send(command).is_err() {
            log::error!("Discord: Watcher supervisor is gone, dropping registration");
            return;
        }

        let confirmation = format!(
            "Now watching `{}` — incoming token transfers will be posted here.",
            address
        );
        if let Err(e) = msg.channel_id.say(&ctx.http, confirmation).await {
            log::error!("Discord: Failed to send confirmation: {}", e);
        }
    }
}

/// Create an access-restricted channel for `user` under the trading
/// category and post the onboarding prompt into it.
///
/// The overwrites hide the channel from `@everyone` and grant view and
/// send to the requesting user and the bot itself.
async fn provision_channel(
    ctx: &Context,
    config: &BotConfig,
    user: &User,
) -> Result<ChannelId, String> {
    let bot_user = ctx
        .http
        .get_current_user()
        .await
        .map_err(|e| format!("Failed to resolve the bot user: {}", e))?;

    // The @everyone role id is the guild id.
    let everyone = RoleId::new(config.guild_id);
    let member_perms =
        Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES | Permissions::READ_MESSAGE_HISTORY;
    let overwrites = vec![
        PermissionOverwrite {
            allow: Permissions::empty(),
            deny: Permissions::VIEW_CHANNEL,
            kind: PermissionOverwriteType::Role(everyone),
        },
        PermissionOverwrite {
            allow: member_perms,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(user.id),
        },
        PermissionOverwrite {
            allow: member_perms,
            deny: Permissions::empty(),
            kind: PermissionOverwriteType::Member(bot_user.id),
        },
    ];

    let builder = CreateChannel::new(format!("trading-{}", user.name.to_lowercase()))
        .kind(ChannelType::Text)
        .category(ChannelId::new(config.trading_category_id))
        .permissions(overwrites);

    let channel = GuildId::new(config.guild_id)
        .create_channel(&ctx.http, builder)
        .await
        .map_err(|e| format!("Channel creation rejected: {}", e))?;

    let prompt = "Welcome! Send `!setwallet <address>` here and I will post every \
        incoming token transfer for that wallet.";
    channel
        .id
        .say(&ctx.http, prompt)
        .await
        .map_err(|e| format!("Failed to post the onboarding prompt: {}", e))?;

    Ok(channel.id)
}

/// Validate an Ethereum address format: `0x` followed by 40 hex digits.
fn is_valid_address(addr: &str) -> bool {
    if !addr.starts_with("0x") {
        return false;
    }
    if addr.len() != 42 {
        return false;
    }
    addr[2..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_address() {
        assert!(is_valid_address(
            "0x1234567890123456789012345678901234567890"
        ));
    }

    #[test]
    fn test_case_insensitive_hex() {
        assert!(is_valid_address(
            "0xAbCdEf7890123456789012345678901234567890"
        ));
    }

    #[test]
    fn test_invalid_no_prefix() {
        assert!(!is_valid_address(
            "1234567890123456789012345678901234567890"
        ));
    }

    #[test]
    fn test_invalid_too_short() {
        assert!(!is_valid_address("0x123"));
    }

    #[test]
    fn test_invalid_too_long() {
        assert!(!is_valid_address(
            "0x12345678901234567890123456789012345678901"
        ));
    }

    #[test]
    fn test_invalid_non_hex() {
        assert!(!is_valid_address(
            "0xGGGG567890123456789012345678901234567890"
        ));
    }
}
