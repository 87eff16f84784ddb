//! Configuration loading from INI files.

use std::path::Path;

use config::{Config, File, FileFormat};

use super::{ConfigError, OVERLAY_ENV_VAR, Settings};

impl Settings {
    /// Load settings from an INI file, merging the overlay file named by
    /// `QUILL_CONFIG_OVERLAY` on top if the variable is set.
    ///
    /// Relative paths in the result resolve against the config file's
    /// directory. Validation happens here so missing keys and bad values
    /// fail at boot.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::new(&path.to_string_lossy(), FileFormat::Ini));

        if let Ok(overlay) = std::env::var(OVERLAY_ENV_VAR) {
            builder = builder.add_source(File::new(&overlay, FileFormat::Ini));
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        let settings = settings.with_root(path);
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const BASE_INI: &str = r#"
[site]
title = Running with Suitcases
description = A travel blog
base_url = https://example.com
date_created = 2021-03-01

[render]
posts_per_page = 2

[author]
name = Chris
description = Blogger
email = chris@example.com
image = /static/portrait.jpg
job_title = Engineer
telephone = +1-555-0100
"#;

    fn write_ini(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".ini")
            .tempfile()
            .expect("create temp ini");
        file.write_all(contents.as_bytes()).expect("write temp ini");
        file
    }

    #[test]
    fn test_load_minimal_config() {
        let file = write_ini(BASE_INI);
        let settings = Settings::load(file.path()).expect("config should load");

        assert_eq!(settings.site.title, "Running with Suitcases");
        assert_eq!(settings.render.posts_per_page, 2);
        // Defaults kick in for omitted sections
        assert_eq!(settings.routes.posts, "post");
        assert_eq!(settings.templates.not_found, "_404.html");
        assert_eq!(settings.root, file.path().parent().unwrap());
    }

    #[test]
    fn test_missing_section_fails_at_load() {
        let file = write_ini(
            r#"
[site]
title = No render section
description = x
base_url = https://example.com
date_created = 2021-03-01
"#,
        );
        assert!(Settings::load(file.path()).is_err());
    }

    #[test]
    fn test_zero_posts_per_page_rejected() {
        let ini = BASE_INI.replace("posts_per_page = 2", "posts_per_page = 0");
        let file = write_ini(&ini);
        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_trailing_slash_base_url_rejected() {
        let ini = BASE_INI.replace(
            "base_url = https://example.com",
            "base_url = https://example.com/",
        );
        let file = write_ini(&ini);
        assert!(matches!(
            Settings::load(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_date_created_rejected() {
        let ini = BASE_INI.replace("date_created = 2021-03-01", "date_created = March 2021");
        let file = write_ini(&ini);
        assert!(matches!(
            Settings::load(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_derived_urls() {
        let file = write_ini(BASE_INI);
        let settings = Settings::load(file.path()).expect("config should load");
        assert_eq!(settings.about_url(), "https://example.com/about/");
        assert_eq!(settings.archive_url(), "https://example.com/archive/");
    }
}
