use colored::Colorize;
use inquire::{Select, Text};

use crate::{
    catalog::CharacterSource,
    commands::App,
    error::AppError,
    pagination::{PageWindow, parse_page_param},
    storage::KeyValueStore,
    validation::{prompt_until_valid, validate_input_job_title, validate_input_username},
};

const SIGN_IN: &str = "sign in";
const BROWSE: &str = "browse characters";
const NEXT_PAGE: &str = "next page";
const PREVIOUS_PAGE: &str = "previous page";
const JUMP_TO_PAGE: &str = "jump to page";
const SHOW_CHARACTER: &str = "show character";
const EDIT_PROFILE: &str = "edit profile";
const SIGN_OUT: &str = "sign out";
const QUIT: &str = "quit";

/// Listing position kept between menu actions
struct Browsing {
    page: u32,
    window: Option<PageWindow>,
}

/// Runs interactive menu interface
pub fn run_menu<S, C>(app: &mut App<S, C>) -> Result<(), AppError>
where
    S: KeyValueStore,
    C: CharacterSource,
{
    let mut browsing = Browsing {
        page: 1,
        window: None,
    };

    loop {
        let actions: Vec<&'static str> = if app.session().is_authenticated() {
            vec![
                BROWSE,
                NEXT_PAGE,
                PREVIOUS_PAGE,
                JUMP_TO_PAGE,
                SHOW_CHARACTER,
                EDIT_PROFILE,
                SIGN_OUT,
                QUIT,
            ]
        } else {
            vec![SIGN_IN, QUIT]
        };

        let action_selected: &'static str =
            Select::new(&format!("{}", "select action".blue()), actions).prompt()?;

        match action_selected {
            SIGN_IN => menu_sign_in(app)?,
            BROWSE => {
                let page = browsing.page;
                show_page(app, &mut browsing, page);
            }
            NEXT_PAGE => match browsing.window.as_ref().and_then(PageWindow::next_page) {
                Some(next) => show_page(app, &mut browsing, next),
                None => println!("{}", "no next page".red()),
            },
            PREVIOUS_PAGE => match browsing.window.as_ref().and_then(PageWindow::previous_page) {
                Some(previous) => show_page(app, &mut browsing, previous),
                None => println!("{}", "no previous page".red()),
            },
            JUMP_TO_PAGE => {
                let input: String = Text::new(&format!("{}", "page number:".blue())).prompt()?;
                show_page(app, &mut browsing, parse_page_param(Some(&input)));
            }
            SHOW_CHARACTER => menu_show_character(app, browsing.page)?,
            EDIT_PROFILE => menu_edit_profile(app)?,
            SIGN_OUT => {
                println!("{}", app.logout_user());
                browsing = Browsing {
                    page: 1,
                    window: None,
                };
            }
            QUIT => {
                println!("{}", "quitting".yellow());
                break Ok(());
            }
            _ => unreachable!("unexpected input"),
        }
    }
}

/// Prints a listing page and remembers it for next/previous
fn show_page<S, C>(app: &App<S, C>, browsing: &mut Browsing, page: u32)
where
    S: KeyValueStore,
    C: CharacterSource,
{
    match app.browse(page) {
        Ok((view, window)) => {
            println!("{view}");
            browsing.page = window.current_page;
            browsing.window = Some(window);
        }
        Err(err) => println!("{err}"),
    }
}

/// Menu for signing in
fn menu_sign_in<S, C>(app: &mut App<S, C>) -> Result<(), AppError>
where
    S: KeyValueStore,
    C: CharacterSource,
{
    let username: String = prompt_until_valid(
        &format!("{}", "enter username:".blue()),
        None,
        validate_input_username,
    )?;
    let job_title: String = prompt_until_valid(
        &format!("{}", "enter job title:".blue()),
        None,
        validate_input_job_title,
    )?;

    println!("{}", app.login_user(&username, &job_title)?);
    Ok(())
}

/// Menu for editing the signed-in profile, prefilled with current values
fn menu_edit_profile<S, C>(app: &mut App<S, C>) -> Result<(), AppError>
where
    S: KeyValueStore,
    C: CharacterSource,
{
    let (current_username, current_job_title) = match app.session().user() {
        Some(user) => (user.username.clone(), user.job_title.clone()),
        None => return Err(AppError::SignInRequired),
    };

    let username: String = prompt_until_valid(
        &format!("{}", "enter username:".blue()),
        Some(&current_username),
        validate_input_username,
    )?;
    let job_title: String = prompt_until_valid(
        &format!("{}", "enter job title:".blue()),
        Some(&current_job_title),
        validate_input_job_title,
    )?;

    println!("{}", app.update_user(&username, &job_title)?);
    Ok(())
}

/// Menu for opening one character over the current listing page
fn menu_show_character<S, C>(app: &App<S, C>, page: u32) -> Result<(), AppError>
where
    S: KeyValueStore,
    C: CharacterSource,
{
    let id: String = Text::new(&format!("{}", "character id:".blue())).prompt()?;
    let id = id.trim();
    if id.is_empty() {
        println!("{}", "no character id given".red());
        return Ok(());
    }

    match app.show_character(id, page) {
        Ok(view) => println!("{view}"),
        Err(err) => println!("{err}"),
    }
    Ok(())
}
