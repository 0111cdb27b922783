use handlebars::Handlebars;
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "assets/templates/"]
struct Templates;

/// Creates Handlebars registry with all email templates embedded into the binary, every template
/// is registered under its file name without the `.hbs` extension.
pub fn create_templates() -> anyhow::Result<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();
    handlebars.register_embed_templates_with_extension::<Templates>(".hbs")?;

    Ok(handlebars)
}
