//! Template content for the init command.

/// Starting point for a new build definition. Every optional section is
/// present but disabled, so the file validates as written once the
/// placeholders are filled in.
pub const BUILD_YML_TEMPLATE: &str = r#"# Build definition for drun.
#
# Run `drun magic <target>` to build the whole site, or one stage at a time
# with `drun build`, `drun make`, `drun install` and so on.

build:
  # Repository holding the site directory. Required for `--nuke`.
  git: git@example.com:mysite.git
  # Remote alias of the site, with the leading '@'.
  drush_alias: "@mysite.local"
  profile: standard
  # Install from a database dump instead (forces the minimal profile).
  # install_db: /path/to/dump.sql
  # Directory under sites/ the repository is cloned into.
  sites_subdir: mysite
  # make: mysite.make
  # make:
  #   file: mysite.make
  #   path: sites/mysite
  #   options:
  #     working-copy: true
  sites:
    - mysite.local

site:
  site_name: My Site
  root_username: admin
  root_password: admin
  # theme: mysite_theme

database:
  db_name: mysite
  db_username: root
  db_password: root
  # driver: mysql
  # host: localhost
  # port: 3306

pre:
  enabled: false
  modules: []
  commands: []

features: []

migrate:
  enabled: false
  # dependencies: [migrate_d2d]
  # source:
  #   files:
  #     variable: mysite_file_migration
  #     dir: /var/www/old/files
  # groups: []
  # migrations: []

post:
  enabled: false
  modules: []
  commands: []
"#;
