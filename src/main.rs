use std::{error::Error, path::PathBuf};

use alarmio::{
    config::Config, listing, state_entries, AlarmDraft, AlarmId, AlarmStateStore, AlarmStore,
    AlarmTime, Day, FilePreferences,
};
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// config file to use instead of the default one
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// directory the alarms are stored in, overrides the config
    #[clap(long, global = true)]
    data_dir: Option<PathBuf>,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// write a default config file
    Init {
        #[clap(long, short)]
        force: bool,
    },
    /// show all alarms (the default)
    List,
    /// add an alarm, at the current time unless --time is given
    Add {
        #[clap(long, short)]
        time: Option<AlarmTime>,
        /// repeat days: Su M Tu W Th F S
        days: Vec<Day>,
    },
    /// change the time and/or repeat days of an alarm
    Edit {
        id: AlarmId,
        #[clap(long, short)]
        time: Option<AlarmTime>,
        /// replaces all repeat days, pass no values to clear them
        #[clap(long, short, num_args = 0..)]
        days: Option<Vec<Day>>,
    },
    Delete {
        id: AlarmId,
    },
    Enable {
        id: AlarmId,
    },
    Disable {
        id: AlarmId,
    },
    /// show every stored enabled flag, including ones left behind by deleted alarms
    States,
}

struct App {
    config: Config,
    alarms: AlarmStore<FilePreferences>,
    states: AlarmStateStore<FilePreferences>,
}

impl App {
    fn new(config: Config, data_dir: PathBuf) -> Self {
        info!("using alarm data in {}", data_dir.display());
        Self {
            config,
            alarms: AlarmStore::open(&data_dir),
            states: AlarmStateStore::open(&data_dir),
        }
    }

    fn find(&self, id: AlarmId) -> Result<alarmio::Alarm, alarmio::Error> {
        self.alarms
            .get(id)
            .ok_or(alarmio::Error::UnknownAlarm(id))
    }

    fn list(&self) {
        print!(
            "{}",
            listing::render_alarms(
                &self.alarms.list(),
                |alarm| self.states.get(alarm),
                &self.config.time_format,
            )
        );
    }

    fn add(&mut self, time: Option<AlarmTime>, days: Vec<Day>) -> Result<(), alarmio::Error> {
        let mut draft = AlarmDraft::new();
        if let Some(time) = time {
            draft.set_time(time);
        }
        draft.set_days(days);
        self.finish(draft)
    }

    fn edit(
        &mut self,
        id: AlarmId,
        time: Option<AlarmTime>,
        days: Option<Vec<Day>>,
    ) -> Result<(), alarmio::Error> {
        let mut draft = AlarmDraft::edit(self.find(id)?);
        if let Some(time) = time {
            draft.set_time(time);
        }
        if let Some(days) = days {
            draft.set_days(days);
        }
        self.finish(draft)
    }

    fn finish(&mut self, draft: AlarmDraft) -> Result<(), alarmio::Error> {
        let title = draft.title();
        let state = draft.save(&mut self.alarms)?;
        println!("{}", listing::render_saved(title, &state));
        Ok(())
    }

    fn delete(&mut self, id: AlarmId) -> Result<(), alarmio::Error> {
        if self.alarms.delete_by_id(id)? {
            println!("deleted alarm {id}");
            Ok(())
        } else {
            Err(alarmio::Error::UnknownAlarm(id))
        }
    }

    fn set_enabled(&mut self, id: AlarmId, enabled: bool) -> Result<(), alarmio::Error> {
        let alarm = self.find(id)?;
        self.states.set(&alarm, enabled)?;
        println!(
            "alarm {id} {}",
            if enabled { "enabled" } else { "disabled" }
        );
        // the flag is per time, so every alarm at this time follows it
        let sharing = self
            .alarms
            .list()
            .iter()
            .filter(|other| other.id != id && other.time == alarm.time)
            .count();
        if sharing > 0 {
            println!("note: {sharing} other alarm(s) at {} share this switch", alarm.time);
        }
        Ok(())
    }

    fn states(&self) {
        let entries = state_entries(&self.alarms.list(), self.states.entries());
        print!("{}", listing::render_states(&entries));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => Config::config_path()?,
    };

    if let Some(Command::Init { force }) = args.command {
        if force || !config_path.exists() {
            Config::new().save(&config_path)?;
            println!("wrote {}", config_path.display());
        } else {
            println!(
                "{} already exists, use --force to overwrite it",
                config_path.display()
            );
        }
        return Ok(());
    }

    let config = Config::load(&config_path)?;

    // initilize the logger
    if let Err(e) = simple_file_logger::init_logger!("alarmio") {
        eprintln!("couldn't initialize logger: {e:?}");
    }
    log::set_max_level(config.log_level()?);

    let data_dir = match args.data_dir {
        Some(dir) => dir,
        None => config.data_dir()?,
    };
    let mut app = App::new(config, data_dir);

    match args.command.unwrap_or(Command::List) {
        Command::Init { .. } | Command::List => app.list(),
        Command::Add { time, days } => app.add(time, days)?,
        Command::Edit { id, time, days } => app.edit(id, time, days)?,
        Command::Delete { id } => app.delete(id)?,
        Command::Enable { id } => app.set_enabled(id, true)?,
        Command::Disable { id } => app.set_enabled(id, false)?,
        Command::States => app.states(),
    }
    Ok(())
}
