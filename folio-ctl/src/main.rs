use anyhow::{anyhow, Context};
use folio_client::{
    api::{Comment, CommentId, NewComment},
    CommentList, HttpStore, Session,
};

#[derive(structopt::StructOpt)]
struct Opt {
    #[structopt(short, long)]
    host: String,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// List the newest comments
    List {
        /// Maximum number of comments to show
        #[structopt(short, long, default_value = "10")]
        num: usize,
    },

    /// Delete a comment
    Delete {
        /// Comment id
        id: String,
    },

    /// Delete every comment
    DeleteAll,

    /// Post a comment through the contact form
    Post {
        #[structopt(long)]
        name: String,

        #[structopt(long)]
        email: String,

        #[structopt(long)]
        subject: String,

        message: String,
    },
}

fn print_list(list: &CommentList) {
    if list.is_empty() {
        println!("(no comments)");
    }
    for c in list {
        println!("{}\t{}", c.id, c.message);
    }
}

/// Fail when the last operation left a notice behind
fn check_notice(session: &Session<HttpStore>) -> anyhow::Result<()> {
    match session.controller().notice() {
        Some(notice) => Err(anyhow!("{notice}")),
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = <Opt as structopt::StructOpt>::from_args();

    // the contact form answers with a redirect to a page we do not care about
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("building http client")?;
    let store = HttpStore::with_client(opt.host, client);

    match opt.cmd {
        Command::List { num } => {
            let mut session = Session::new(store);
            session.refresh(num).await;
            check_notice(&session)?;
            print_list(session.view());
        }
        Command::Delete { id } => {
            let mut session = Session::new(store);
            let comment = Comment {
                id: CommentId(id),
                message: String::new(),
            };
            session.delete_one(&comment).await;
            check_notice(&session)?;
            tracing::info!(id = %comment.id, "deleted comment");
        }
        Command::DeleteAll => {
            let mut session = Session::new(store);
            session.delete_all().await;
            check_notice(&session)?;
            tracing::info!("deleted all comments");
        }
        Command::Post {
            name,
            email,
            subject,
            message,
        } => {
            let comment = NewComment {
                name,
                email,
                subject,
                message,
            };
            let mut session = Session::new(store);
            session.post_comment(&comment).await;
            check_notice(&session)?;
            tracing::info!("submitted contact form");
        }
    }

    Ok(())
}
