//! CLI parser definition.

use clap::Parser;

use yomiage_core::text::NameMode;

/// Command-line interface definition for the yomiage speech relay server.
#[derive(Parser)]
#[command(name = "yomiage")]
#[command(about = "Relay game dialogue to a VOICEVOX engine and play it aloud")]
#[command(version)]
pub struct Cli {
    /// Character profile to activate (directory under the profiles root)
    #[arg(long, default_value = "default")]
    pub profile: String,

    /// Directory holding the character profiles
    #[arg(long = "profiles-dir", default_value = "profiles")]
    pub profiles_dir: String,

    /// Host the intake server binds to
    #[arg(long, default_value = yomiage_core::settings::DEFAULT_INTAKE_HOST)]
    pub host: String,

    /// Port the intake server binds to
    #[arg(long, default_value_t = yomiage_core::DEFAULT_INTAKE_PORT)]
    pub port: u16,

    /// Base URL of the VOICEVOX engine
    #[arg(long = "engine-url", default_value = yomiage_core::DEFAULT_ENGINE_URL)]
    pub engine_url: String,

    /// Speaker-framing removal strategy for untagged dialogue
    #[arg(long = "name-mode", value_enum, default_value_t = NameModeArg::Auto)]
    pub name_mode: NameModeArg,

    /// Disable suppression of duplicate utterances
    #[arg(long = "no-dedup")]
    pub no_dedup: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// clap-friendly mirror of [`NameMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum NameModeArg {
    Keep,
    StripPrefix,
    StripFirstLine,
    Auto,
}

impl From<NameModeArg> for NameMode {
    fn from(arg: NameModeArg) -> Self {
        match arg {
            NameModeArg::Keep => Self::Keep,
            NameModeArg::StripPrefix => Self::StripPrefix,
            NameModeArg::StripFirstLine => Self::StripFirstLine,
            NameModeArg::Auto => Self::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_settings() {
        let cli = Cli::parse_from(["yomiage"]);
        assert_eq!(cli.profile, "default");
        assert_eq!(cli.port, yomiage_core::DEFAULT_INTAKE_PORT);
        assert_eq!(cli.engine_url, yomiage_core::DEFAULT_ENGINE_URL);
        assert_eq!(cli.name_mode, NameModeArg::Auto);
        assert!(!cli.no_dedup);
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from([
            "yomiage",
            "--profile",
            "gameA",
            "--port",
            "6100",
            "--name-mode",
            "strip-prefix",
            "-v",
        ]);
        assert_eq!(cli.profile, "gameA");
        assert_eq!(cli.port, 6100);
        assert_eq!(NameMode::from(cli.name_mode), NameMode::StripPrefix);
        assert!(cli.verbose);
    }
}
