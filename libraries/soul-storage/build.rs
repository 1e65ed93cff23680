//! `sqlx::migrate!` embeds the SQL files at compile time, so edits to the
//! compositions or scanner_state schema have to invalidate the build.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
