use camino::Utf8Path;
use indexmap::IndexMap;
use regex::Regex;
use std::fs;
use std::sync::LazyLock;

/// Finds `Key=Value` for the recognised keys anywhere in a line, so a UTF-8
/// BOM or other leading bytes do not hide the first flag.
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Block_Ads|Block_Banner|Enable_Developer|Enable_Auto_Update|Enable_Log)=(.*)$")
    .expect("Invalid config line regex")
});

/// Flags recognised in `config.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticFlag {
    BlockAds,
    BlockBanner,
    EnableDeveloper,
    EnableAutoUpdate,
    EnableLog,
}

impl StaticFlag {
    pub const ALL: [StaticFlag; 5] = [
        StaticFlag::BlockAds,
        StaticFlag::BlockBanner,
        StaticFlag::EnableDeveloper,
        StaticFlag::EnableAutoUpdate,
        StaticFlag::EnableLog,
    ];

    /// Key as written in the file.
    pub fn key(self) -> &'static str {
        match self {
            Self::BlockAds => "Block_Ads",
            Self::BlockBanner => "Block_Banner",
            Self::EnableDeveloper => "Enable_Developer",
            Self::EnableAutoUpdate => "Enable_Auto_Update",
            Self::EnableLog => "Enable_Log",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.key() == key)
    }

    fn default_value(self) -> bool {
        !matches!(self, Self::EnableLog)
    }
}

/// Feature flags read once at startup from `config.ini`.
///
/// Never written back by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticConfig {
    flags: IndexMap<StaticFlag, bool>,
}

impl Default for StaticConfig {
    /// Flags used when no config file exists: everything on except logging.
    fn default() -> Self {
        Self {
            flags: StaticFlag::ALL
                .into_iter()
                .map(|flag| (flag, flag.default_value()))
                .collect(),
        }
    }
}

impl StaticConfig {
    /// Load flags from `path`, falling back to [`StaticConfig::default`] when
    /// the file cannot be opened. Never fails.
    pub fn load<P: AsRef<Utf8Path>>(path: P) -> Self {
        let path = path.as_ref();

        match fs::read(path) {
            Ok(bytes) => {
                let config = Self::parse(&String::from_utf8_lossy(&bytes));
                tracing::info!("Loaded static config from {}", path);
                config
            }
            Err(e) => {
                tracing::info!("Static config {} not readable ({}), using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Scan `text` line by line. Unknown keys and malformed lines are ignored;
    /// a recognised key is true only for the literal value `1`. Flags the text
    /// never mentions are false.
    pub fn parse(text: &str) -> Self {
        let mut flags: IndexMap<StaticFlag, bool> =
            StaticFlag::ALL.into_iter().map(|flag| (flag, false)).collect();

        for line in text.lines() {
            let Some(captures) = LINE_PATTERN.captures(line) else {
                continue;
            };
            let Some(flag) = StaticFlag::from_key(&captures[1]) else {
                continue;
            };
            flags.insert(flag, captures[2].trim_end() == "1");
        }

        Self { flags }
    }

    pub fn get(&self, flag: StaticFlag) -> bool {
        self.flags.get(&flag).copied().unwrap_or(false)
    }

    pub fn block_ads(&self) -> bool {
        self.get(StaticFlag::BlockAds)
    }

    pub fn block_banner(&self) -> bool {
        self.get(StaticFlag::BlockBanner)
    }

    pub fn enable_developer(&self) -> bool {
        self.get(StaticFlag::EnableDeveloper)
    }

    pub fn enable_auto_update(&self) -> bool {
        self.get(StaticFlag::EnableAutoUpdate)
    }

    pub fn enable_log(&self) -> bool {
        self.get(StaticFlag::EnableLog)
    }

    /// Iterate flags in file order.
    pub fn iter(&self) -> impl Iterator<Item = (StaticFlag, bool)> + '_ {
        self.flags.iter().map(|(flag, value)| (*flag, *value))
    }
}
