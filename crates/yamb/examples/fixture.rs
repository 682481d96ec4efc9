//! Example of editing a test fixture through typed facades.
//!
//! RUST_LOG=yamb=debug cargo run --package yamb --example fixture

use tracing_subscriber::EnvFilter;
use yamb::{Format, Model, model};

model! {
    pub struct Account {
        name: Attr,
        balance: Attr = 0,
    }
}

model! {
    pub struct Fixture {
        owner: Another<Account>,
        accounts: Many<Account>,
        source: Unmanaged = "inline",
    }
}

const FIXTURE: &str = "
owner:
  name: amy
accounts:
- name: savings
  balance: 120
- name: checking
";

fn main() -> Result<(), yamb::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let fixture = Fixture::load(FIXTURE)?;
    let Some(accounts) = fixture.accounts().get()? else {
        return Ok(());
    };

    for account in accounts.iter() {
        let account = account?;
        let name = account.name().get();
        let balance = account.balance().get().as_i64().unwrap_or_default();
        println!("{}: {balance}", name.as_str().unwrap_or("?"));
    }

    let extra = Account::new();
    extra.name().set("travel")?;
    extra.balance().set(15)?;
    accounts.push(&extra);
    accounts.remove(1)?;

    if let Some(owner) = fixture.owner().get()? {
        owner.name().set("bob")?;
    }

    println!("loaded from {:?}", fixture.source().get());
    print!("{}", fixture.dump()?);
    println!("{}", fixture.dump_with(&"json".parse::<Format>()?)?);
    Ok(())
}
