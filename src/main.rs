use log::debug;
use recipe_import::{scale_factor, scale_ingredients, ImportConfig, RecipeImporter};
use std::env;

const USAGE: &str = "Usage:
  recipe-import <url> [--scale <factor> | --servings <n>]
  recipe-import --caption-file <path> --source <url> [--scale <factor> | --servings <n>]";

#[derive(Debug, Default)]
struct Args {
    url: Option<String>,
    caption_file: Option<String>,
    source: Option<String>,
    scale: Option<f64>,
    servings: Option<f64>,
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = raw.iter();

    while let Some(arg) = iter.next() {
        let flag = arg.as_str();
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{flag} needs a value"))
        };
        match flag {
            "--caption-file" => args.caption_file = Some(value()?),
            "--source" => args.source = Some(value()?),
            "--scale" => args.scale = Some(parse_number(flag, &value()?)?),
            "--servings" => args.servings = Some(parse_number(flag, &value()?)?),
            flag if flag.starts_with("--") => return Err(format!("Unknown option {flag}")),
            url if args.url.is_none() => args.url = Some(url.to_string()),
            extra => return Err(format!("Unexpected argument {extra}")),
        }
    }
    Ok(args)
}

fn parse_number(flag: &str, value: &str) -> Result<f64, String> {
    value
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
        .ok_or_else(|| format!("{flag} expects a positive number, got '{value}'"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&raw).map_err(|e| format!("{e}\n{USAGE}"))?;

    let config = ImportConfig::load()?;
    let builder = RecipeImporter::builder().config(config);
    let builder = match (&args.url, &args.caption_file) {
        (Some(url), None) => builder.url(url),
        (None, Some(path)) => {
            let source = args
                .source
                .as_deref()
                .ok_or_else(|| format!("--caption-file needs --source\n{USAGE}"))?;
            let caption = tokio::fs::read_to_string(path).await?;
            builder.caption(caption, source)
        }
        _ => return Err(USAGE.into()),
    };

    let mut recipe = builder.build().await?;
    debug!("{:#?}", recipe);

    let factor = match (args.scale, args.servings) {
        (Some(factor), _) => Some(factor),
        (None, Some(desired)) => {
            let base = recipe.servings.as_deref().unwrap_or_default();
            let factor = scale_factor(base, desired);
            if factor.is_none() {
                return Err(format!("Cannot scale: recipe servings '{base}' has no number").into());
            }
            factor
        }
        (None, None) => None,
    };
    if let Some(factor) = factor {
        recipe.ingredients = scale_ingredients(&recipe.ingredients, factor);
    }

    println!("{}", serde_json::to_string_pretty(&recipe)?);
    Ok(())
}
