use once_cell::sync::Lazy;
use regex::Regex;

pub const TRUSTED_USERS: &[&str] = &["arlequim93", "razor2911"];
pub const TRUSTED_RANK: u32 = 12;
pub const DEFAULT_RANK: u32 = 5;
pub const DEFAULT_QUALITY: &str = "720p";

// canonical spelling
pub const VALID_RELEASES: &[&str] = &[
    "AMIABLE", "AVS", "BATV", "BLOW", "CAKES", "CMRG", "CRAVERS", "DEFLATE", "DIMENSION", "DRONES",
    "EDITH", "EVO", "FGT", "FLEET", "FLUX", "GalaxyRG", "GECKOS", "GGEZ", "GOSSIP", "HONE",
    "ION10", "KILLERS", "KOGi", "LOL", "MiNX", "NOSiViD", "NTb", "NTG", "PHOENiX", "playWEB",
    "PSA", "RARBG", "ROVERS", "SiGMA", "SMURF", "SPARKS", "STRiFE", "SVA", "SYNCOPY", "TBS",
    "TEPES", "TGx", "TOMMY", "ViSUM", "XLF", "YIFY", "YTS",
];

static RELEASE_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    VALID_RELEASES
        .iter()
        .filter_map(|release| {
            let pattern = format!(
                r"(?i)(?:^|[^a-z0-9]){}(?:[^a-z0-9]|$)",
                regex::escape(release)
            );
            Regex::new(&pattern).ok().map(|re| (*release, re))
        })
        .collect()
});

pub fn is_trusted(user: &str) -> bool {
    TRUSTED_USERS.contains(&user)
}

pub fn find_release(text: &str) -> Option<&'static str> {
    RELEASE_PATTERNS
        .iter()
        .filter_map(|(release, re)| re.find(text).map(|m| (m.start(), *release)))
        .min_by_key(|(start, _)| *start)
        .map(|(_, release)| release)
}

pub fn releases_mentioned(text: &str) -> Vec<&'static str> {
    RELEASE_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(release, _)| *release)
        .collect()
}
