use std::path::PathBuf;

use crate::client::{ApiClient, HttpClient};
use crate::config::Config;
use crate::error::{ConvergeError, Result};
use crate::inbox::InboxService;
use crate::matching::{InviteTracker, MatchService};
use crate::profile::ProfileService;
use crate::project::ProjectService;
use crate::rating::{prompt_raw_scores, render_categories, RaterContext, RatingService};
use crate::resume::ResumeService;
use crate::ui::UI;
use crate::version::CURRENT_VERSION;
use crate::{
    AcceptArgs, Commands, CompleteArgs, ExploreArgs, InviteArgs, LoginArgs, MatchesArgs, PostArgs,
    ProfileArgs, RateArgs, ResumeArgs, ResumeCommand, ShowArgs,
};

use converge_protocol::api::CreateProjectRequest;
use converge_protocol::common::RequestKind;

/// CLI handler for processing commands
pub struct CliHandler {
    config: Config,
    ui: UI,
}

impl CliHandler {
    /// Resolve configuration and build the handler
    pub fn new(config_path: Option<PathBuf>, endpoint: Option<String>) -> Result<Self> {
        let config = Config::load_from(config_path.as_deref())?.with_endpoint(endpoint);
        config.validate()?;
        let ui = UI::new(config.ui.color, config.ui.progress);
        Ok(Self { config, ui })
    }

    fn client(&self) -> Result<HttpClient> {
        HttpClient::new(&self.config)
    }

    /// Execute a CLI command
    pub async fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Login(args) => self.handle_login(args).await,
            Commands::Logout => self.handle_logout().await,
            Commands::Status => self.handle_status().await,
            Commands::Profile(args) => self.handle_profile(args).await,
            Commands::Resume(args) => self.handle_resume(args).await,
            Commands::Projects => self.handle_projects().await,
            Commands::Explore(args) => self.handle_explore(args).await,
            Commands::Show(args) => self.handle_show(args).await,
            Commands::Post(args) => self.handle_post(args).await,
            Commands::Matches(args) => self.handle_matches(args).await,
            Commands::Invite(args) => self.handle_invite(args).await,
            Commands::Inbox => self.handle_inbox().await,
            Commands::Accept(args) => self.handle_accept(args).await,
            Commands::Rate(args) => self.handle_rate(args).await,
            Commands::Complete(args) => self.handle_complete(args).await,
            Commands::Config => self.handle_config(),
        }
    }

    async fn handle_login(&self, args: LoginArgs) -> Result<()> {
        let api_key = match args.api_key {
            Some(key) => key,
            None => dialoguer::Password::new()
                .with_prompt("API key")
                .interact()?,
        };

        let client = self.client()?;
        let identity = client.auth().login(&api_key).await?;
        self.ui
            .success(&format!("Logged in as {}", identity.username));
        Ok(())
    }

    async fn handle_logout(&self) -> Result<()> {
        let client = self.client()?;
        client.auth().logout().await?;
        self.ui.success("Logged out");
        Ok(())
    }

    async fn handle_status(&self) -> Result<()> {
        let client = self.client()?;
        let mut lines = vec![
            format!("Version:   {}", CURRENT_VERSION),
            format!("Endpoint:  {}", self.config.client.endpoint),
        ];
        match client.identity() {
            Some(identity) => {
                lines.push("Auth:      logged in".to_string());
                lines.push(format!("Username:  {}", identity.username));
                lines.push(format!("User id:   {}", identity.user_id));
            }
            None => lines.push("Auth:      not logged in".to_string()),
        }
        self.ui.card("Status", &lines);
        Ok(())
    }

    async fn handle_profile(&self, args: ProfileArgs) -> Result<()> {
        let client = self.client()?;
        let service = ProfileService::new(&client);
        let profile = match args.id {
            Some(id) => service.profile(id).await?,
            None => service.my_profile().await?,
        };
        service.render(&self.ui, &profile);
        Ok(())
    }

    async fn handle_resume(&self, args: ResumeArgs) -> Result<()> {
        let client = self.client()?;
        match args.command {
            ResumeCommand::Upload { file } => {
                let report = ResumeService::new(&client).ingest(&file, &self.ui).await?;
                self.ui.success(&format!(
                    "Resume uploaded: {} page(s), {} characters extracted",
                    report.pages, report.characters
                ));
            }
            ResumeCommand::Download { id, output } => {
                let path = ProfileService::new(&client)
                    .download_resume(id, &output)
                    .await?;
                self.ui
                    .success(&format!("Resume saved to {}", path.display()));
            }
        }
        Ok(())
    }

    async fn handle_projects(&self) -> Result<()> {
        let client = self.client()?;
        let service = ProjectService::new(&client);
        let projects = service.mine().await?;

        if projects.is_empty() {
            self.ui.info("No projects yet. Post one with `converge post`.");
            return Ok(());
        }

        self.ui.header("Your projects");
        for project in &projects {
            service.render_row(&self.ui, project);
        }
        Ok(())
    }

    async fn handle_explore(&self, args: ExploreArgs) -> Result<()> {
        let client = self.client()?;
        let service = ProjectService::new(&client);
        let feed = service.explore(args.filter).await?;

        if feed.is_empty() {
            self.ui.info("Nothing matches this filter right now.");
            return Ok(());
        }

        self.ui.header("Opportunities");
        for opportunity in &feed {
            service.render_row(&self.ui, opportunity);
        }
        Ok(())
    }

    async fn handle_show(&self, args: ShowArgs) -> Result<()> {
        let client = self.client()?;
        let service = ProjectService::new(&client);
        let project = service.detail(args.project_id).await?;
        service.render_detail(&self.ui, &project);
        Ok(())
    }

    async fn handle_post(&self, args: PostArgs) -> Result<()> {
        let client = self.client()?;
        let request = CreateProjectRequest {
            title: args.title,
            description: args.description,
            skills: args.skills,
            preferred_tech: args.tech,
            domains: args.domains,
            kind: args.kind.into(),
            github: args.github,
            is_public: !args.private,
        };

        let created = ProjectService::new(&client).post(request, &self.ui).await?;
        self.ui.success(&format!(
            "Posted \"{}\" as project #{}",
            created.title, created.id
        ));
        Ok(())
    }

    async fn handle_matches(&self, args: MatchesArgs) -> Result<()> {
        let client = self.client()?;
        let service = MatchService::new(&client);
        let spinner = self.ui.spinner("Fetching matches");
        let response = service.matches(args.project_id).await;
        spinner.finish_and_clear();
        let response = response?;

        if response.matches.is_empty() {
            self.ui.info("No matches yet; the engine may still be processing.");
            return Ok(());
        }

        self.ui
            .header(&format!("Matches for project #{}", args.project_id));
        let mut tracker = InviteTracker::new();
        for (i, candidate) in response.matches.iter().enumerate() {
            let candidate_id = candidate
                .profile
                .subject_id()
                .unwrap_or(candidate.resume_id);
            service.render(
                &self.ui,
                i + 1,
                candidate,
                tracker.already_sent(candidate_id),
            );

            if args.invite
                && !tracker.already_sent(candidate_id)
                && self.ui.confirm(
                    &format!("Invite {}?", candidate.profile.display_name()),
                    false,
                )?
            {
                match service
                    .invite(args.project_id, candidate, &mut tracker)
                    .await
                {
                    Ok(true) => self.ui.success("Invite sent"),
                    Ok(false) => self.ui.info("Already invited"),
                    Err(e) => self.ui.error(&e.to_string()),
                }
            }
            self.ui.blank();
        }
        Ok(())
    }

    async fn handle_invite(&self, args: InviteArgs) -> Result<()> {
        let client = self.client()?;
        ProjectService::new(&client)
            .invite(args.project_id, &args.email)
            .await?;
        self.ui.success(&format!(
            "Invited {} to project #{}",
            args.email, args.project_id
        ));
        Ok(())
    }

    async fn handle_inbox(&self) -> Result<()> {
        let client = self.client()?;
        let service = InboxService::new(&client);
        let requests = service.pending().await?;

        if requests.is_empty() {
            self.ui.info("Inbox is empty.");
            return Ok(());
        }

        self.ui.header("Pending requests");
        for request in &requests {
            service.render_row(&self.ui, request);
        }
        Ok(())
    }

    async fn handle_accept(&self, args: AcceptArgs) -> Result<()> {
        let client = self.client()?;
        let service = InboxService::new(&client);
        let requests = service.pending().await?;
        let request = requests
            .iter()
            .find(|r| r.request_id == args.request_id)
            .ok_or_else(|| {
                ConvergeError::not_found(format!("pending request {}", args.request_id))
            })?;

        let (remaining, projects) = service.accept_invite(request).await?;
        self.ui.success(&format!(
            "Joined \"{}\"",
            request.project_title.as_deref().unwrap_or("the project")
        ));
        self.ui.info(&format!(
            "{} request(s) pending, {} project(s) on your list",
            remaining.len(),
            projects.len()
        ));
        Ok(())
    }

    async fn handle_rate(&self, args: RateArgs) -> Result<()> {
        let client = self.client()?;
        let inbox = InboxService::new(&client);
        let requests = inbox.pending().await?;
        let request = requests
            .iter()
            .find(|r| r.request_id == args.request_id && r.kind == RequestKind::RatingRequest)
            .ok_or_else(|| {
                ConvergeError::not_found(format!("rating request {}", args.request_id))
            })?;

        // Stale references fail here, before any survey prompt.
        let (project_id, subject) = inbox.rating_target(request)?;
        let rater = RaterContext::from_client(&client)?;

        let raw = prompt_raw_scores(&self.ui, subject.display_name())?;
        let scores = RatingService::new(&client)
            .submit(rater, &subject, project_id, raw)
            .await?;

        self.ui.success("Rating submitted");
        render_categories(&self.ui, &scores);

        let remaining = inbox.pending().await?;
        self.ui
            .info(&format!("{} request(s) still pending", remaining.len()));
        Ok(())
    }

    async fn handle_complete(&self, args: CompleteArgs) -> Result<()> {
        let client = self.client()?;
        let service = ProjectService::new(&client);
        let project = service.detail(args.project_id).await?;

        if project.is_completed() {
            self.ui.info("Project is already completed.");
            return Ok(());
        }

        if !args.force {
            let confirmed = self.ui.confirm(
                &format!(
                    "Complete \"{}\"? Teammates will be asked to rate each other.",
                    project.title
                ),
                false,
            )?;
            if !confirmed {
                return Err(ConvergeError::user_cancelled());
            }
        }

        service.complete(args.project_id).await?;
        self.ui.success(&format!("\"{}\" marked completed", project.title));
        if !project.teammates.is_empty() {
            self.ui.info(&format!(
                "{} teammate(s) will receive rating requests",
                project.teammates.len()
            ));
        }
        Ok(())
    }

    fn handle_config(&self) -> Result<()> {
        let config_file = Config::default_config_file()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "unknown".to_string());
        self.ui.card(
            "Configuration",
            &[
                format!("Endpoint:     {}", self.config.client.endpoint),
                format!("Timeout:      {}s", self.config.client.timeout_secs),
                format!("Verify TLS:   {}", self.config.client.verify_tls),
                format!("Progress:     {}", self.config.ui.progress),
                format!("Color:        {}", self.config.ui.color),
                format!("Config file:  {}", config_file),
            ],
        );
        Ok(())
    }
}
