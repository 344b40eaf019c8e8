use std::sync::Arc;

use minidi::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let context = Context::init(AppModule::new("greeter")).unwrap();
    let app = context.resolve_one::<App>().unwrap();
    app.run();
}

struct AppModule {
    app_name: &'static str,
}

impl AppModule {
    fn new(app_name: &'static str) -> Self {
        Self { app_name }
    }
}

impl Module for AppModule {
    fn configure(&self, context: &Context) -> Result<(), InjectorError> {
        context.register_instance(AppName(self.app_name))?;
        context.register_class::<ConsoleLogger>()?;
        context.register_class::<EnglishGreeter>()?;
        context.register_class::<ChineseGreeter>()?;
        context.register_instance(App::default())?;
        Ok(())
    }
}

#[derive(Bean)]
struct AppName(&'static str);

trait Logger: Send + Sync + 'static {
    fn log(&self, message: &str);
}

#[derive(Bean)]
#[bean(provides(dyn Logger))]
struct ConsoleLogger {
    app_name: &'static str,
}

#[component]
impl ConsoleLogger {
    #[inject]
    pub fn new(app_name: Arc<AppName>) -> Self {
        Self {
            app_name: app_name.0,
        }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        eprintln!("[{}] {}", self.app_name, message);
    }
}

trait Greeter: Send + Sync + 'static {
    fn greet(&self);
}

#[derive(Bean)]
#[bean(provides(dyn Greeter))]
struct EnglishGreeter {
    logger: Arc<dyn Logger>,
}

#[component]
impl EnglishGreeter {
    #[inject]
    fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Greeter for EnglishGreeter {
    fn greet(&self) {
        self.logger.log("Hello World!");
    }
}

#[derive(Bean)]
#[bean(provides(dyn Greeter))]
struct ChineseGreeter {
    logger: Arc<dyn Logger>,
}

#[component]
impl ChineseGreeter {
    #[inject]
    fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Greeter for ChineseGreeter {
    fn greet(&self) {
        self.logger.log("你好世界!");
    }
}

#[derive(Default, Bean)]
#[bean(post_construct(announce))]
struct App {
    #[resource]
    logger: Autowired<dyn Logger>,
    #[resource]
    greeters: Vec<Arc<dyn Greeter>>,
}

impl App {
    fn announce(&mut self) {
        self.logger
            .log(&format!("{} greeters are ready", self.greeters.len()));
    }

    fn run(&self) {
        self.logger.log("Greeting from minidi managed beans:");
        for greeter in &self.greeters {
            greeter.greet();
        }
    }
}
