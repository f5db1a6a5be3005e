//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain types once
//! validation has passed.

use agora_domain::{ChannelId, GovernanceConfig, GuildId, ProposalTypeConfig, WITHDRAW_LABEL};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Severity of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration is usable but probably not what was intended.
    Warning,
    /// The configuration cannot be used as-is.
    Error,
}

/// A single validation finding, tied to the field that caused it.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{tag}: {}: {}", self.field, self.message)
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Owning community.
    pub guild: FileGuildConfig,
    /// Expiry sweep cadence.
    pub scheduler: FileSchedulerConfig,
    /// Structured audit output.
    pub audit: FileAuditConfig,
    /// One `[[proposal_type]]` table per governed category, in
    /// classification order.
    #[serde(rename = "proposal_type")]
    pub proposal_types: Vec<FileProposalTypeConfig>,
}

/// `[guild]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGuildConfig {
    /// Platform id of the community this engine governs.
    pub id: String,
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSchedulerConfig {
    /// Seconds between expiry sweeps.
    pub poll_interval_secs: u64,
    /// Seconds to wait before the first sweep.
    pub startup_delay_secs: u64,
}

impl Default for FileSchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
            startup_delay_secs: 5,
        }
    }
}

/// `[audit]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// JSONL audit log destination. Auditing is disabled when unset.
    pub log_file: Option<PathBuf>,
}

/// One `[[proposal_type]]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProposalTypeConfig {
    pub name: String,
    pub debate_channel: String,
    pub vote_channel: String,
    pub resolutions_channel: String,
    pub support_threshold: u32,
    pub vote_duration_secs: i64,
    pub format_labels: Vec<String>,
}

impl FileProposalTypeConfig {
    fn to_domain(&self) -> ProposalTypeConfig {
        ProposalTypeConfig {
            name: self.name.clone(),
            debate_channel: ChannelId::new(self.debate_channel.clone()),
            vote_channel: ChannelId::new(self.vote_channel.clone()),
            resolutions_channel: ChannelId::new(self.resolutions_channel.clone()),
            support_threshold: self.support_threshold,
            vote_duration_secs: self.vote_duration_secs,
            format_labels: self.format_labels.clone(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors make the configuration unusable; warnings are reported but do
    /// not block startup.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.guild.id.is_empty() {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                field: "guild.id".to_string(),
                message: "guild id is required".to_string(),
            });
        }

        if self.proposal_types.is_empty() {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                field: "proposal_type".to_string(),
                message: "no proposal types configured; the engine will track nothing"
                    .to_string(),
            });
        }

        if self.scheduler.poll_interval_secs == 0 {
            issues.push(ConfigIssue {
                severity: Severity::Error,
                field: "scheduler.poll_interval_secs".to_string(),
                message: "poll interval must be at least one second".to_string(),
            });
        }

        let mut seen_names: HashSet<&str> = HashSet::new();
        let mut seen_debate_channels: HashSet<&str> = HashSet::new();

        for (i, pt) in self.proposal_types.iter().enumerate() {
            let field = |suffix: &str| format!("proposal_type[{i}].{suffix}");

            if pt.name.is_empty() {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    field: field("name"),
                    message: "type name must not be empty".to_string(),
                });
            } else if !seen_names.insert(&pt.name) {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    field: field("name"),
                    message: format!("duplicate type name '{}'", pt.name),
                });
            }

            // The classifier stops at the first type whose debate channel
            // matches; a second type on the same channel is unreachable.
            if !pt.debate_channel.is_empty() && !seen_debate_channels.insert(&pt.debate_channel)
            {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    field: field("debate_channel"),
                    message: format!(
                        "debate channel '{}' is already claimed by an earlier type",
                        pt.debate_channel
                    ),
                });
            }

            for (channel_field, value) in [
                ("debate_channel", &pt.debate_channel),
                ("vote_channel", &pt.vote_channel),
                ("resolutions_channel", &pt.resolutions_channel),
            ] {
                if value.is_empty() {
                    issues.push(ConfigIssue {
                        severity: Severity::Error,
                        field: field(channel_field),
                        message: "channel id must not be empty".to_string(),
                    });
                }
            }

            if pt.support_threshold == 0 {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    field: field("support_threshold"),
                    message: "a zero threshold would move every message to a vote".to_string(),
                });
            }

            if pt.vote_duration_secs <= 0 {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    field: field("vote_duration_secs"),
                    message: "vote duration must be positive".to_string(),
                });
            }

            if pt.format_labels.is_empty() {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    field: field("format_labels"),
                    message: "at least one format label is required".to_string(),
                });
            }

            if pt
                .format_labels
                .iter()
                .any(|l| l.eq_ignore_ascii_case(WITHDRAW_LABEL))
            {
                issues.push(ConfigIssue {
                    severity: Severity::Error,
                    field: field("format_labels"),
                    message: format!(
                        "'{WITHDRAW_LABEL}' is reserved and accepted for every type"
                    ),
                });
            }
        }

        issues
    }

    /// Whether [`validate`](Self::validate) found any errors.
    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }

    /// The guild this configuration governs.
    pub fn guild_id(&self) -> GuildId {
        GuildId::new(self.guild.id.clone())
    }

    /// Convert into the domain governance configuration.
    pub fn governance(&self) -> GovernanceConfig {
        GovernanceConfig::new(self.proposal_types.iter().map(|t| t.to_domain()).collect())
    }
}
