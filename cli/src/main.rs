use clap::{Parser, Subcommand};
use academy::learning::{self, LearningError};
use academy::model::{CrudRepository, DatabaseError, DbConnection, ModelManager};
use academy::model::entity::{
    Certification,
    CertificationCreate,
    Lesson,
    LessonCreate,
    Module,
    ModuleCreate,
    QuestionOption,
    QuestionOptionCreate,
    Quiz,
    QuizCreate,
    QuizQuestion,
    QuizQuestionCreate,
    QuizQuestionWithOptions,
    UserEntity,
    UserEntityCreateUpdate,
};
use academy::web::AuthenticatedUser;

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the academy DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Manage quizzes
    Quiz {
        #[command(subcommand)]
        action: QuizCommands,
    },

    /// Manage quiz questions
    Question {
        #[command(subcommand)]
        action: QuestionCommands,
    },

    /// Manage certifications
    Certification {
        #[command(subcommand)]
        action: CertificationCommands,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
}

/// Module management
#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

/// Lesson management
#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        /// Module title to attach the lesson to
        #[arg(long)]
        module_title: String,
        #[arg(long)]
        title: String,
        /// Path to a Markdown file with lesson content
        #[arg(long)]
        file: String,
        #[arg(long)]
        video_url: Option<String>,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
}

/// Quiz management
#[derive(Subcommand, Debug)]
pub enum QuizCommands {
    Add {
        /// Lesson title to attach the quiz to
        #[arg(long)]
        lesson_title: String,
        #[arg(long)]
        title: String,
        /// Passing threshold in whole percent, 0 to 100
        #[arg(long, default_value_t = 70)]
        passing_score: i32,
    },
    /// Verify every question of the quiz has exactly one correct option
    Check {
        #[arg(long)]
        quiz_title: String,
    },
}

/// Question management
#[derive(Subcommand, Debug)]
pub enum QuestionCommands {
    Add {
        /// Quiz title to attach the question to
        #[arg(long)]
        quiz_title: String,
        #[arg(long)]
        question_text: String,
        #[arg(long)]
        explanation: String,
        #[arg(long, default_value_t = 0)]
        order_index: i32,
    },
    AddOption {
        /// Question text to attach the option to
        #[arg(long)]
        question_text: String,
        #[arg(long)]
        option_text: String,
        #[arg(long, default_value_t = false)]
        is_correct: bool,
    },
}

/// Certification management
#[derive(Subcommand, Debug)]
pub enum CertificationCommands {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        level: String,
        #[arg(long)]
        description: String,
        /// Module titles required for the certification, repeatable
        #[arg(long = "module")]
        modules: Vec<String>,
    },
}

async fn module_id_by_title(mm: &ModelManager, title: &str) -> Result<uuid::Uuid, DatabaseError> {
    sqlx::query_scalar("SELECT id FROM modules WHERE title = $1")
        .bind(title)
        .fetch_one(mm.executor())
        .await
        .map_err(DatabaseError::SqlxError)
}

#[tokio::main]
async fn main() -> academy::error::AppResult<()> {
    let _ = dotenvy::dotenv();
    let args = Cli::parse();

    let db_con = DbConnection::connect(&std::env::var("DATABASE_URL").unwrap())?;
    let mm = ModelManager::new(db_con);
    let actor = AuthenticatedUser::admin();

    match args.command {
        Commands::User { action } => match action {
            UserCommands::Add { username, email, full_name, password, .. } => {
                let user = UserEntity::create(
                    &mm,
                    &actor,
                    UserEntityCreateUpdate {
                        username,
                        email,
                        full_name,
                        password_hash: academy::auth::hash_password(&password).unwrap(),
                    },
                )
                .await?;
                println!("User created: {:?}", user);
            }
        },

        Commands::Module { action } => match action {
            ModuleCommands::Add { title, description, order_index } => {
                let module = Module::create(
                    &mm,
                    &actor,
                    ModuleCreate {
                        title,
                        description,
                        order_index: Some(order_index),
                    },
                )
                .await?;
                println!("Module created: {:?}", module);
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add { module_title, title, file, video_url, order_index } => {
                let module_id = module_id_by_title(&mm, &module_title).await?;

                let content = std::fs::read_to_string(file)?;
                let lesson = Lesson::create(
                    &mm,
                    &actor,
                    LessonCreate {
                        module_id,
                        title,
                        content,
                        video_url,
                        order_index: Some(order_index),
                    },
                )
                .await?;
                println!("Lesson created: {:?}", lesson);
            }
        },

        Commands::Quiz { action } => match action {
            QuizCommands::Add { lesson_title, title, passing_score } => {
                if !(0..=100).contains(&passing_score) {
                    return Err(LearningError::PassingScoreOutOfRange(passing_score).into());
                }

                let lesson_id: uuid::Uuid = sqlx::query_scalar("SELECT id FROM lessons WHERE title = $1")
                    .bind(&lesson_title)
                    .fetch_one(mm.executor())
                    .await
                    .map_err(DatabaseError::SqlxError)?;

                let quiz = Quiz::create(
                    &mm,
                    &actor,
                    QuizCreate {
                        lesson_id,
                        title,
                        passing_score,
                    },
                )
                .await?;
                println!("Quiz created: {:?}", quiz);
            }

            QuizCommands::Check { quiz_title } => {
                let quiz_id: uuid::Uuid = sqlx::query_scalar("SELECT id FROM quizzes WHERE title = $1")
                    .bind(&quiz_title)
                    .fetch_one(mm.executor())
                    .await
                    .map_err(DatabaseError::SqlxError)?;

                let questions = QuizQuestionWithOptions::find_all_by_quiz(&mm, &actor, quiz_id).await?;
                for question in &questions {
                    learning::validate_single_correct(&question.to_graded())?;
                }
                println!("Quiz ok: {} questions checked", questions.len());
            }
        },

        Commands::Question { action } => match action {
            QuestionCommands::Add { quiz_title, question_text, explanation, order_index } => {
                let quiz_id: uuid::Uuid = sqlx::query_scalar("SELECT id FROM quizzes WHERE title = $1")
                    .bind(&quiz_title)
                    .fetch_one(mm.executor())
                    .await
                    .map_err(DatabaseError::SqlxError)?;

                let question = QuizQuestion::create(
                    &mm,
                    &actor,
                    QuizQuestionCreate {
                        quiz_id,
                        question_text,
                        explanation,
                        order_index: Some(order_index),
                    },
                )
                .await?;
                println!("Question created: {:?}", question);
            }

            QuestionCommands::AddOption { question_text, option_text, is_correct } => {
                let question_id: uuid::Uuid = sqlx::query_scalar("SELECT id FROM quiz_questions WHERE question_text = $1")
                    .bind(&question_text)
                    .fetch_one(mm.executor())
                    .await
                    .map_err(DatabaseError::SqlxError)?;

                let option = QuestionOption::create(
                    &mm,
                    &actor,
                    QuestionOptionCreate {
                        question_id,
                        option_text,
                        is_correct: Some(is_correct),
                    },
                )
                .await?;
                println!("Option created: {:?}", option);
            }
        },

        Commands::Certification { action } => match action {
            CertificationCommands::Add { name, level, description, modules } => {
                let mut required_modules = Vec::with_capacity(modules.len());
                for title in &modules {
                    required_modules.push(module_id_by_title(&mm, title).await?);
                }

                let certification = Certification::create(
                    &mm,
                    &actor,
                    CertificationCreate {
                        name,
                        level,
                        description,
                        required_modules,
                    },
                )
                .await?;
                println!("Certification created: {:?}", certification);
            }
        },
    }

    Ok(())
}
