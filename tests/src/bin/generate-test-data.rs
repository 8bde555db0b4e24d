use chrono::{Duration, Utc};
use rand::{seq::SliceRandom, Rng};

const NUM_COMMENTS: usize = 60;
const SUBJECT_WORD_COUNT: usize = 4;
const MESSAGE_MIN_WORDS: usize = 5;
const MESSAGE_MAX_WORDS: usize = 40;

const NAMES: &[&str] = &["Ada", "Alan", "Grace", "Edsger", "Barbara", "Ken", "Margaret"];
const DOMAINS: &[&str] = &["example.org", "example.com", "example.net"];

fn gen_n_items(table: &str, columns: &str, n: usize, mut f: impl FnMut(usize) -> String) {
    println!("INSERT INTO {} ({}) VALUES", table, columns);
    for i in 0..n {
        if i != 0 {
            println!(",");
        }
        print!("    {}", f(i));
    }
    println!(";");
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn main() {
    let mut rng = rand::thread_rng();
    let start = Utc::now() - Duration::days(30);

    gen_n_items(
        "comments",
        "name, email, subject, message, timestamp",
        NUM_COMMENTS,
        |i| {
            let name = NAMES.choose(&mut rng).copied().unwrap_or("Anonymous");
            let domain = DOMAINS.choose(&mut rng).copied().unwrap_or("example.org");
            let num_words = rng.gen_range(MESSAGE_MIN_WORDS..=MESSAGE_MAX_WORDS);
            // keep timestamps increasing along with ids
            let date = start + Duration::hours(i as i64 * 12 + rng.gen_range(0..12));
            format!(
                "({}, {}, {}, {}, {})",
                quote(name),
                quote(&format!("{}@{}", name.to_lowercase(), domain)),
                quote(&lipsum::lipsum_words(SUBJECT_WORD_COUNT)),
                quote(&lipsum::lipsum_words(num_words)),
                date.timestamp_millis(),
            )
        },
    );
}
