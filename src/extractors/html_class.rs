use super::{element_text, meta_content, Extractor, ParsingContext};
use crate::error::ImportError;
use crate::model::{ImageSource, RecipeData, UNTITLED_PLACEHOLDER_TITLE};
use log::debug;
use scraper::{ElementRef, Html, Selector};

/// Structural fallback for pages without structured data.
///
/// Expects noise elements to have been stripped already. Never fails: empty
/// ingredient/instruction lists mean nothing list-like was found.
pub struct HtmlClassExtractor;

/// Containers whose attributes mention one of `markers`, and the descendant
/// elements that hold one item each.
struct ContainerPattern {
    markers: &'static [&'static str],
    attributes: &'static [&'static str],
    items: &'static str,
}

const INGREDIENT_CONTAINERS: ContainerPattern = ContainerPattern {
    markers: &["ingredient"],
    attributes: &["class", "id", "aria-label"],
    items: "li",
};

const INSTRUCTION_CONTAINERS: ContainerPattern = ContainerPattern {
    markers: &["instruction", "direction", "step"],
    attributes: &["class", "id"],
    items: "li, p",
};

/// Short labelled values some recipe plugins render outside any list.
const PREP_TIME_MARKERS: &[&str] = &["prep-time", "prep_time", "preptime"];
const COOK_TIME_MARKERS: &[&str] = &["cook-time", "cook_time", "cooktime"];
const SERVINGS_MARKERS: &[&str] = &["recipe-servings", "recipe-yield", "servings"];
const MAX_LABEL_LEN: usize = 40;

impl ContainerPattern {
    fn matches(&self, element: &ElementRef) -> bool {
        self.attributes.iter().any(|attr| {
            element.value().attr(attr).is_some_and(|value| {
                let value = value.to_lowercase();
                self.markers.iter().any(|marker| value.contains(marker))
            })
        })
    }

    /// Items of every matching container, in document order. Nested or
    /// repeated containers yield their items again.
    fn collect(&self, document: &Html) -> Vec<String> {
        let all = Selector::parse("*").expect("valid selector");
        let items = Selector::parse(self.items).expect("valid selector");

        let mut found = Vec::new();
        let mut containers = 0;
        for container in document.select(&all).filter(|el| self.matches(el)) {
            containers += 1;
            found.extend(
                container
                    .select(&items)
                    .map(element_text)
                    .filter(|text| !text.is_empty()),
            );
        }
        debug!(
            "HtmlClassExtractor: {} containers matching {:?} gave {} items",
            containers,
            self.markers,
            found.len()
        );
        found
    }
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn find_label(document: &Html, markers: &[&str]) -> Option<String> {
    let all = Selector::parse("[class]").expect("valid selector");
    document
        .select(&all)
        .filter(|el| {
            el.value().attr("class").is_some_and(|class| {
                let class = class.to_lowercase();
                markers.iter().any(|marker| class.contains(marker))
            })
        })
        .map(element_text)
        .find(|text| !text.is_empty() && text.chars().count() <= MAX_LABEL_LEN)
}

impl Extractor for HtmlClassExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<RecipeData, ImportError> {
        debug!("HtmlClassExtractor: Starting parse for URL: {}", context.url);
        let document = &context.document;

        let hostname = context.hostname();
        let title = meta_content(document, r#"meta[property="og:title"]"#)
            .or_else(|| first_text(document, "h1"))
            .or_else(|| hostname.clone())
            .unwrap_or_else(|| UNTITLED_PLACEHOLDER_TITLE.to_string());

        let description = meta_content(document, r#"meta[property="og:description"]"#)
            .or_else(|| meta_content(document, r#"meta[name="description"]"#));

        let images = meta_content(document, r#"meta[property="og:image"]"#)
            .map(|url| vec![ImageSource::Url(url)])
            .unwrap_or_default();

        let recipe = RecipeData {
            title,
            description,
            ingredients: INGREDIENT_CONTAINERS.collect(document),
            instructions: INSTRUCTION_CONTAINERS.collect(document),
            images,
            prep_time: find_label(document, PREP_TIME_MARKERS),
            cook_time: find_label(document, COOK_TIME_MARKERS),
            servings: find_label(document, SERVINGS_MARKERS),
            source_url: context.url.clone(),
            tags: None,
        };

        let fallback = hostname.unwrap_or_else(|| UNTITLED_PLACEHOLDER_TITLE.to_string());
        Ok(recipe.finalize(&fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> RecipeData {
        let mut context = ParsingContext::new("https://cooking.example.org/soup", html);
        context.strip_noise();
        HtmlClassExtractor.parse(&context).unwrap()
    }

    #[test]
    fn test_containers_by_class_id_and_aria_label() {
        let recipe = parse(
            r#"<html><body>
                <h1>Tomato Soup</h1>
                <div class="Recipe-Ingredients"><ul><li>4 tomatoes</li><li> </li></ul></div>
                <section aria-label="Ingredient list"><ul><li>1 onion</li></ul></section>
                <ol id="directions"><li>Chop.</li><li>Simmer <b>20</b> min.</li></ol>
                <div class="step-block"><p>Blend.</p></div>
            </body></html>"#,
        );

        assert_eq!(recipe.title, "Tomato Soup");
        assert_eq!(recipe.ingredients, vec!["4 tomatoes", "1 onion"]);
        assert_eq!(recipe.instructions, vec!["Chop.", "Simmer 20 min.", "Blend."]);
    }

    #[test]
    fn test_nested_containers_repeat_items() {
        let recipe = parse(
            r#"<div class="ingredients"><ul class="ingredient-list"><li>salt</li></ul></div>"#,
        );
        assert_eq!(recipe.ingredients, vec!["salt", "salt"]);
    }

    #[test]
    fn test_meta_tags_take_priority() {
        let recipe = parse(
            r#"<html><head>
                <meta property="og:title" content="OG Title">
                <meta name="description" content="Plain description">
                <meta property="og:image" content="https://cdn.example.org/soup.jpg">
            </head><body><h1>Heading</h1></body></html>"#,
        );

        assert_eq!(recipe.title, "OG Title");
        assert_eq!(recipe.description.as_deref(), Some("Plain description"));
        assert_eq!(
            recipe.images,
            vec![ImageSource::Url("https://cdn.example.org/soup.jpg".to_string())]
        );
    }

    #[test]
    fn test_empty_page_falls_back_to_hostname() {
        let recipe = parse("<html><body><p>Nothing here</p></body></html>");
        assert_eq!(recipe.title, "cooking.example.org");
        assert!(recipe.ingredients.is_empty());
        assert!(recipe.instructions.is_empty());
        assert!(recipe.images.is_empty());
    }

    #[test]
    fn test_short_labels() {
        let recipe = parse(
            r#"<span class="wprm-recipe-prep-time">15 minutes</span>
               <span class="recipe-servings">4 servings</span>"#,
        );
        assert_eq!(recipe.prep_time.as_deref(), Some("15 minutes"));
        assert_eq!(recipe.servings.as_deref(), Some("4 servings"));
        assert_eq!(recipe.cook_time, None);
    }
}
