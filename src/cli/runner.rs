//! CLI runner - executes commands

use crate::aggregate::{AggregateConfig, Aggregator, QuerySpec};
use crate::cli::commands::{
    Cli, Commands, DdbCommand, GetEventsArgs, ListBucketsArgs, ListGroupsArgs, ListTablesArgs,
    LogsCommand, S3Command, SearchArgs,
};
use crate::config::{normalize_limit, validate_endpoint, AppConfig, Profile};
use crate::error::{Error, Result, ResultExt};
use crate::http::{
    ApiClient, ApiClientConfig, LOGS_CONTENT_TYPE, REST_XML_CONTENT_TYPE, TABLES_CONTENT_TYPE,
};
use crate::output::{render_record, Alignment, Column, Table};
use crate::pagination::PageFetcher;
use crate::sources::{
    BucketsAdapter, GroupFilter, HttpTailSource, LogEventsAdapter, LogGroupsAdapter,
    LogStreamsAdapter, TablesAdapter, DEFAULT_BUCKETS_PAGE_SIZE, DEFAULT_EVENTS_PAGE_SIZE,
    DEFAULT_GROUPS_PAGE_SIZE, DEFAULT_STREAMS_PAGE_SIZE, DEFAULT_TABLES_PAGE_SIZE,
};
use crate::tail::{TailExit, TailMultiplexer};
use crate::types::{Bucket, LogGroup, Record};
use crate::window::TimeWindow;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let profile = self.load_profile()?;

        match &self.cli.command {
            Commands::Logs { command } => match command {
                LogsCommand::List(args) => self.list_groups(&profile, args).await,
                LogsCommand::Get(args) => self.get_events(&profile, args).await,
                LogsCommand::Search(args) => self.search(&profile, args).await,
            },
            Commands::Ddb {
                command: DdbCommand::List(args),
            } => self.list_tables(&profile, args).await,
            Commands::S3 {
                command: S3Command::List(args),
            } => self.list_buckets(&profile, args).await,
        }
    }

    /// Load the selected profile, or built-in defaults without a config file
    fn load_profile(&self) -> Result<Profile> {
        let config = match &self.cli.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        config.profile(self.cli.profile.as_deref())
    }

    fn client(&self, endpoint: &str, content_type: &str, profile: &Profile) -> Result<ApiClient> {
        let endpoint = self.cli.endpoint.as_deref().unwrap_or(endpoint);
        validate_endpoint(endpoint)?;
        debug!(endpoint = %endpoint, "Using endpoint");

        let config = ApiClientConfig::builder()
            .endpoint(endpoint)
            .content_type(content_type)
            .timeout(Duration::from_secs(profile.timeout_secs))
            .build();
        ApiClient::new(config)
    }

    fn logs_client(&self, profile: &Profile) -> Result<ApiClient> {
        self.client(profile.logs_endpoint(), LOGS_CONTENT_TYPE, profile)
    }

    fn tables_client(&self, profile: &Profile) -> Result<ApiClient> {
        self.client(profile.tables_endpoint(), TABLES_CONTENT_TYPE, profile)
    }

    fn buckets_client(&self, profile: &Profile) -> Result<ApiClient> {
        self.client(profile.buckets_endpoint(), REST_XML_CONTENT_TYPE, profile)
    }

    // ========================================================================
    // logs list
    // ========================================================================

    async fn list_groups(&self, profile: &Profile, args: &ListGroupsArgs) -> Result<()> {
        let client = self.logs_client(profile)?;
        let filter = group_filter(args.pattern.as_deref(), args.prefix.as_deref());
        let limit = resolve_limit(args.all, args.limit, profile.limits.groups);

        let groups = fetch_groups(&client, filter, limit).await?;
        if groups.is_empty() {
            info!("No groups found");
            return Ok(());
        }

        // Only the first page of streams is shown per group
        let mut streams = HashMap::new();
        if args.streams {
            for group in &groups {
                let adapter = LogStreamsAdapter::new(client.clone(), &group.name);
                let page = PageFetcher::new(adapter, DEFAULT_STREAMS_PAGE_SIZE)
                    .next_page()
                    .await
                    .map_err(|e| Error::adapter(&group.name, e.to_string()))?;
                let names: Vec<String> = page.into_iter().map(|s| s.name).collect();
                streams.insert(group.name.clone(), names);
            }
        }

        let table = groups_table(&groups, &streams, args.arn, args.retention, args.streams);
        println!("{}", table.render(self.cli.format)?);
        Ok(())
    }

    // ========================================================================
    // logs get
    // ========================================================================

    async fn get_events(&self, profile: &Profile, args: &GetEventsArgs) -> Result<()> {
        let client = self.logs_client(profile)?;
        let window = TimeWindow::resolve(
            Some(args.since.as_str()),
            Some(args.until.as_str()),
            Utc::now(),
        )?;

        let spec = QuerySpec::new(&args.group)
            .with_filter(args.filter.clone())
            .with_window(window)
            .with_limit(resolve_limit(args.all, args.limit, profile.limits.events));

        let records = fetch_events(&client, vec![spec], profile.max_concurrency).await?;
        self.print_records(&records)?;

        if args.tail {
            self.tail(client, vec![args.group.clone()], args.filter.as_deref())
                .await?;
        }
        Ok(())
    }

    // ========================================================================
    // logs search
    // ========================================================================

    async fn search(&self, profile: &Profile, args: &SearchArgs) -> Result<()> {
        let client = self.logs_client(profile)?;
        let window =
            TimeWindow::resolve(Some(args.since.as_str()), args.until.as_deref(), Utc::now())?;

        let filter = group_filter(args.pattern.as_deref(), args.prefix.as_deref());
        let group_limit = resolve_limit(
            args.all_groups,
            args.limit_groups,
            profile.limits.search_groups,
        );
        let groups = fetch_groups(&client, filter, group_limit).await?;
        info!("{} groups found", groups.len());

        let event_limit = resolve_limit(args.all, args.limit, profile.limits.events);
        let specs = groups
            .iter()
            .map(|g| {
                QuerySpec::new(&g.name)
                    .with_filter(args.filter.clone())
                    .with_window(window)
                    .with_limit(event_limit)
            })
            .collect();

        let concurrency = args.max_par.unwrap_or(profile.max_concurrency);
        let records = fetch_events(&client, specs, concurrency).await?;
        self.print_records(&records)?;

        if args.tail {
            let identifiers = groups
                .iter()
                .map(|g| g.tail_identifier().to_string())
                .collect();
            self.tail(client, identifiers, args.filter.as_deref()).await?;
        }
        Ok(())
    }

    // ========================================================================
    // ddb list
    // ========================================================================

    async fn list_tables(&self, profile: &Profile, args: &ListTablesArgs) -> Result<()> {
        let client = self.tables_client(profile)?;
        let limit = resolve_limit(args.all, args.limit, profile.limits.tables);

        let names = PageFetcher::new(TablesAdapter::new(client), DEFAULT_TABLES_PAGE_SIZE)
            .with_limit(limit)
            .all()
            .await?;

        if names.is_empty() {
            info!("No tables found");
            return Ok(());
        }

        println!("{}", tables_table(&names).render(self.cli.format)?);
        Ok(())
    }

    // ========================================================================
    // s3 list
    // ========================================================================

    async fn list_buckets(&self, profile: &Profile, args: &ListBucketsArgs) -> Result<()> {
        let client = self.buckets_client(profile)?;
        let limit = resolve_limit(args.all, args.limit, profile.limits.buckets);

        let adapter = BucketsAdapter::new(client).with_region(args.region.clone());
        let buckets = PageFetcher::new(adapter, DEFAULT_BUCKETS_PAGE_SIZE)
            .with_limit(limit)
            .all()
            .await?;

        if buckets.is_empty() {
            info!("No buckets found");
            return Ok(());
        }

        println!("{}", buckets_table(&buckets).render(self.cli.format)?);
        Ok(())
    }

    // ========================================================================
    // Output
    // ========================================================================

    fn print_records(&self, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            info!("No events found");
            return Ok(());
        }

        for record in records {
            println!("{}", render_record(record, self.cli.format)?);
        }
        Ok(())
    }

    /// Stream live events until every subscription ends or Ctrl-C is pressed
    async fn tail(
        &self,
        client: ApiClient,
        identifiers: Vec<String>,
        filter: Option<&str>,
    ) -> Result<()> {
        if identifiers.is_empty() {
            info!("No groups to tail");
            return Ok(());
        }

        let multiplexer = TailMultiplexer::new(HttpTailSource::new(client));
        let mut tail = multiplexer
            .start(&identifiers, filter)
            .await
            .context("Failed to start live tail")?;
        info!(
            subscriptions = tail.subscriptions(),
            "Live tail started, press Ctrl-C to stop"
        );

        let format = self.cli.format;
        let exit = tail
            .drain_until(tokio::signal::ctrl_c(), |record| {
                println!("{}", render_record(&record, format)?);
                Ok(())
            })
            .await?;

        match exit {
            TailExit::Ended => info!("Live tail ended"),
            TailExit::Interrupted => info!("Live tail interrupted"),
        }
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Limit for a listing: `--all` wins, then the flag, then the profile default
pub(crate) fn resolve_limit(all: bool, flag: Option<i64>, default: i64) -> Option<u32> {
    if all {
        None
    } else {
        normalize_limit(flag.unwrap_or(default))
    }
}

/// Group name filter from mutually exclusive flags; empty values are ignored
pub(crate) fn group_filter(pattern: Option<&str>, prefix: Option<&str>) -> GroupFilter {
    match (pattern, prefix) {
        (Some(p), _) if !p.is_empty() => GroupFilter::Pattern(p.to_string()),
        (_, Some(p)) if !p.is_empty() => GroupFilter::Prefix(p.to_string()),
        _ => GroupFilter::All,
    }
}

async fn fetch_groups(
    client: &ApiClient,
    filter: GroupFilter,
    limit: Option<u32>,
) -> Result<Vec<LogGroup>> {
    let adapter = LogGroupsAdapter::new(client.clone()).with_filter(filter);
    PageFetcher::new(adapter, DEFAULT_GROUPS_PAGE_SIZE)
        .with_limit(limit)
        .all()
        .await
}

async fn fetch_events(
    client: &ApiClient,
    specs: Vec<QuerySpec>,
    concurrency: usize,
) -> Result<Vec<Record>> {
    let config = AggregateConfig::new()
        .with_max_concurrency(concurrency)
        .with_default_page_size(DEFAULT_EVENTS_PAGE_SIZE);
    Aggregator::new(config)
        .run(specs, |spec| LogEventsAdapter::new(client.clone(), spec))
        .await
}

fn format_date(millis: Option<i64>) -> String {
    millis
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// Table of log groups; optional columns are hidden unless requested
pub(crate) fn groups_table(
    groups: &[LogGroup],
    streams: &HashMap<String, Vec<String>>,
    show_arn: bool,
    show_retention: bool,
    show_streams: bool,
) -> Table {
    let mut table = Table::new(vec![
        Column::new("index", "#").with_align(Alignment::Right),
        Column::new("creation", "Creation"),
        Column::new("name", "Name"),
        Column::new("arn", "Arn").with_visible(show_arn),
        Column::new("retention", "Retention")
            .with_align(Alignment::Right)
            .with_visible(show_retention),
        Column::new("streams", "Streams").with_visible(show_streams),
    ]);

    for (index, group) in groups.iter().enumerate() {
        let retention = group
            .retention_in_days
            .map_or_else(|| "-".to_string(), |days| format!("{days} days"));
        let stream_names = streams.get(&group.name).map(|s| s.join(", ")).unwrap_or_default();

        table.add_row([
            ("index", (index + 1).to_string()),
            ("creation", format_date(group.creation_time)),
            ("name", group.name.clone()),
            ("arn", group.arn.clone().unwrap_or_default()),
            ("retention", retention),
            ("streams", stream_names),
        ]);
    }
    table
}

/// Table of table names
pub(crate) fn tables_table(names: &[String]) -> Table {
    let mut table = Table::new(vec![
        Column::new("index", "#").with_align(Alignment::Right),
        Column::new("name", "Name"),
    ]);
    for (index, name) in names.iter().enumerate() {
        table.add_row([("index", (index + 1).to_string()), ("name", name.clone())]);
    }
    table
}

/// Table of buckets
pub(crate) fn buckets_table(buckets: &[Bucket]) -> Table {
    let mut table = Table::new(vec![
        Column::new("index", "#").with_align(Alignment::Right),
        Column::new("creation", "Creation"),
        Column::new("name", "Name"),
    ]);
    for (index, bucket) in buckets.iter().enumerate() {
        let creation = bucket
            .creation_date
            .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string());
        table.add_row([
            ("index", (index + 1).to_string()),
            ("creation", creation),
            ("name", bucket.name.clone()),
        ]);
    }
    table
}
