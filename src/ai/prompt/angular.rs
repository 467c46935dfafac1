//! Angular component prompts.
//!
//! The component description is a JSON tree of elements (`tag`, `name`,
//! `content`, `attributes`, `styles`, `children`, `svgData`). Each prompt asks
//! for exactly one raw file so the reply can be written after fence cleanup.

use super::PromptBuilder;
use crate::extract::to_kebab_case;
use crate::types::StyleType;

pub const DEFAULT_MAX_TOKENS: u32 = 4000;

fn no_explanations(what: &str) -> String {
    format!("Do NOT include any surrounding explanations, just the raw {what}.")
}

pub fn html(component_name: &str, root_element_json: &str) -> String {
    let kebab = to_kebab_case(component_name);
    PromptBuilder::new()
        .text(format!(
            "Generate the HTML template (`.html` file content) for an Angular component named \
             '{component_name}'."
        ))
        .text("**Component Description (from JSON):**")
        .code("json", root_element_json)
        .numbered_section(
            "**Instructions:**",
            [
                "Translate the JSON structure into a valid HTML template.".to_string(),
                "Use the 'tag' property from the JSON for HTML elements (default to 'div' or infer \
                 semantically if 'tag' is missing)."
                    .to_string(),
                format!(
                    "Use the 'name' property from the JSON as the primary CSS class for the corresponding \
                     element (e.g., \"userName\" becomes `class=\"user-name\"` - use kebab-case). Add the main \
                     component name as a prefix or use BEM if preferred (e.g., \
                     `class=\"{kebab}__user-name\"`), but be consistent. Let's prefer simple kebab-case names \
                     derived from the 'name' field for now: `class=\"user-name\"`."
                ),
                "Include the 'content' property directly within text elements.".to_string(),
                "Use the 'attributes' property to add HTML attributes (e.g., `src`, `alt`, `href`). For now, \
                 assume static values provided in the JSON."
                    .to_string(),
                "Correctly handle nested elements defined in the 'children' arrays.".to_string(),
                "If an element object in the input JSON contains an svgData field, you should directly embed \
                 the string value of svgData into the HTML template at that element's position. In this case \
                 (when svgData is present), ignore the tag field for creating the main element (as the SVG \
                 string provides the <svg> tag itself). You can still apply styles from the styles object to \
                 the <svg> tag itself (like width, height) or potentially wrap the SVG in a div and apply \
                 layout styles (like margin) to the wrapper, if appropriate. Do not process the children \
                 array for elements that have svgData."
                    .to_string(),
                "Keep the component simple - DO NOT add complex form validation, reactive forms, or other \
                 features not explicitly defined in the JSON."
                    .to_string(),
                "DO NOT use ng-model, formGroup, formControlName, or other form directives unless they're \
                 explicitly in the JSON."
                    .to_string(),
                "Use simple property bindings and event bindings (e.g., [property]=\"value\", \
                 (click)=\"method()\") only if they make sense for the component."
                    .to_string(),
                no_explanations("HTML code for the template file"),
            ],
        )
        .build()
}

pub fn styling(component_name: &str, root_element_json: &str, style: StyleType) -> String {
    let kebab = to_kebab_case(component_name);
    let ext = style.extension();
    let upper = ext.to_uppercase();
    let nesting = match style {
        StyleType::Scss => format!(
            "Use SCSS nesting to reflect the element hierarchy if generating SCSS (e.g., \
             `.user-profile-card {{ .avatar {{ ... }} }}`). Let the root element's styles apply to a \
             top-level class like `.{kebab}-wrapper` or similar."
        ),
        StyleType::Css => "Write standard CSS rules.".to_string(),
    };

    PromptBuilder::new()
        .text(format!(
            "Generate the {upper} stylesheet (`.{ext}` file content) for an Angular component named \
             '{component_name}'.\n\
             The component's base selector might be 'app-{kebab}' or just use classes derived from element \
             names.\n\
             Let's target elements using CSS classes derived from the 'name' property in the JSON (converted \
             to kebab-case, e.g., \"userName\" becomes `.user-name`)."
        ))
        .text("**Component Description (from JSON, focus on 'name' and 'styles'):**")
        .code("json", root_element_json)
        .numbered_section(
            "**Instructions:**",
            [
                format!(
                    "Create {upper} rules targeting the elements described in the JSON using their \
                     kebab-cased 'name' as class selectors (e.g., `.avatar`, `.user-name`, `.follow-button`)."
                ),
                "Apply the CSS properties defined in the 'styles' object for each corresponding element."
                    .to_string(),
                "Ensure CSS values (units, colors, etc.) are valid.".to_string(),
                nesting,
                format!(
                    "Do NOT include any surrounding explanations or markdown formatting like ```css, just \
                     the raw {upper} code for the stylesheet file."
                ),
            ],
        )
        .build()
}

pub fn typescript(component_name: &str, style: StyleType) -> String {
    let kebab = to_kebab_case(component_name);
    let ext = style.extension();
    PromptBuilder::new()
        .text(format!(
            "Generate the basic TypeScript class definition (`.ts` file content) for an Angular component \
             named '{component_name}'."
        ))
        .numbered_section(
            "**Instructions:**",
            [
                format!("Create a standard Angular component class named `{component_name}Component`."),
                "Include the `@Component` decorator.".to_string(),
                format!("Set the `selector` property to `'app-{kebab}'`."),
                format!("Set the `templateUrl` property to `'./{kebab}.component.html'`."),
                format!("Set the `styleUrls` property to `['./{kebab}.component.{ext}']`."),
                format!(
                    "Include a basic class structure: `export class {component_name}Component {{ \
                     constructor() {{}} }}`."
                ),
                "DO NOT include any reactive forms, form validation, FormGroup, FormControl, Validators, or \
                 other form-related imports/logic."
                    .to_string(),
                "DO NOT add any properties or methods that would require complex form handling.".to_string(),
                "DO NOT use any imports other than '@angular/core' unless absolutely necessary.".to_string(),
                "Keep the TypeScript very simple - only basic properties and simple methods if needed."
                    .to_string(),
                "Ensure strict TypeScript compliance (all properties must be initialized or marked with '!')."
                    .to_string(),
                "Make all properties have specific types (string, number, boolean, etc.) not 'any'."
                    .to_string(),
                "The component should be extremely simple, just a display component based on the JSON."
                    .to_string(),
                "Ensure necessary imports (e.g., `Component` from `@angular/core`).".to_string(),
                no_explanations("TypeScript code for the `.ts` file"),
            ],
        )
        .build()
}

pub fn app_module(component_name: &str) -> String {
    let kebab = to_kebab_case(component_name);
    PromptBuilder::new()
        .text(format!(
            "Generate the TypeScript app module file (`app.module.ts` file content) for an Angular \
             application that includes the '{component_name}Component'."
        ))
        .numbered_section(
            "**Instructions:**",
            [
                "Create a standard Angular module class named `AppModule`.".to_string(),
                "Include the `@NgModule` decorator.".to_string(),
                format!("Include declarations array with `AppComponent` and `{component_name}Component`."),
                "Include imports array with `BrowserModule` ONLY.".to_string(),
                "DO NOT include ReactiveFormsModule, FormsModule, or other complex modules.".to_string(),
                "Include providers array (empty for now).".to_string(),
                "Include bootstrap array with `AppComponent`.".to_string(),
                format!(
                    "Make imports ONLY from '@angular/core', '@angular/platform-browser', './app.component', \
                     and './{kebab}/{kebab}.component'."
                ),
                "Keep the module extremely simple - it should only bootstrap the basic component.".to_string(),
                no_explanations("TypeScript code for the app module file"),
            ],
        )
        .build()
}

/// Asks for both app component files in one reply, split by
/// `--- app.component.ts ---` and `--- app.component.html ---` markers.
pub fn app_component(component_name: &str) -> String {
    let kebab = to_kebab_case(component_name);
    PromptBuilder::new()
        .text(format!(
            "Generate the basic app component files (HTML and TS) for an Angular application that showcases \
             the 'app-{kebab}' component."
        ))
        .text("**Instructions:**")
        .bullets(
            "1. First, generate the app.component.ts file:",
            [
                "Create the `@Component` decorator with selector 'app-root'",
                "Set templateUrl to './app.component.html'",
                "Set styleUrls to ['./app.component.css']",
                "Create an AppComponent class with a title property initialized to 'Angular Component Demo'",
                "Make it extremely simple - just a display component",
                "Ensure strict TypeScript compliance",
                "DO NOT use any reactive forms or other complex features",
            ],
        )
        .bullets(
            "2. Second, generate the app.component.html file:",
            [
                "Create a simple layout with a header showing the title".to_string(),
                format!("Include the app-{kebab} component tag"),
                "DO NOT use any form directives like formGroup, formControlName, etc.".to_string(),
                "DO NOT include any complex validation logic".to_string(),
                format!("Keep it simple - just a container for the {kebab} component"),
            ],
        )
        .text(
            "3. Format your response with clear separators between the two files, like this:\n\
             --- app.component.ts ---\n\
             [code for app.component.ts]\n\n\
             --- app.component.html ---\n\
             [code for app.component.html]",
        )
        .build()
}
