//! `ttsd version`

/// Print the dotted build identifier.
pub fn execute() {
    println!("{}", ttsd_build_info::full_version());
}
