use std::{env, env::VarError};

/// There's no real CLI for the server, so any argument prints the help text and the current configuration.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // SHOP_JWT_SECRET is left out on purpose
    const DISPLAY_ENVS: [&str; 6] =
        ["RUST_LOG", "SHOP_HOST", "SHOP_PORT", "SHOP_DATABASE_URL", "SHOP_DB_MAX_CONNECTIONS", "SHOP_RUN_MIGRATIONS"];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
