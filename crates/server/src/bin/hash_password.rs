//! Print an argon2 hash for seeding users by hand:
//! `hash-password 'correct horse battery staple'`.

use server::auth::password::hash_password;

fn main() {
    let Some(password) = std::env::args().nth(1) else {
        eprintln!("usage: hash-password <password>");
        std::process::exit(2);
    };

    match hash_password(&password) {
        Ok(hash) => println!("{hash}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
