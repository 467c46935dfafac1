//! Single-program modernization prompts.
//!
//! One RPG member goes through pseudocode, a flow diagram, a business
//! document, a target project skeleton and finally the translated logic.

use super::PromptBuilder;
use crate::types::{RpgType, TargetLanguage};

pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const BUSINESS_DOCUMENT_MAX_TOKENS: u32 = 8000;

const PSEUDOCODE_OUTPUT: &str =
    "Produce only the structured pseudocode text. Do not include explanations or introductions.";

// =============================================================================
// Pseudocode
// =============================================================================

pub fn pseudocode(rpg_type: RpgType, source: &str) -> String {
    let builder = match rpg_type {
        RpgType::Synon => PromptBuilder::new()
            .role(
                "Act as an expert RPG code analyzer specializing in code generated by CASE tools like \
                 Synon/2E/Plex. Analyze the following RPGLE source code, which **was generated by Synon**.",
            )
            .text("**RPG Code:**")
            .code("rpgle", source)
            .section(
                "Instructions:",
                [
                    "Recognize that this code is generated and may contain Synon-specific patterns, generic \
                     work fields (e.g., W@, #, $ prefixes), and standardized subroutines (e.g., for file I/O, \
                     function keys, subfile processing, *EXIT/*CANCL routines).",
                    "Focus on inferring the underlying business logic despite the generated boilerplate. Try \
                     to determine the purpose of key work fields based on their usage.",
                    "Identify the main processing flow, paying attention to how control transfers between \
                     potentially numerous generated subroutines.",
                    "Identify all file I/O operations (CHAIN, READ, READE, READP, WRITE, UPDATE, DELETE, SQL \
                     operations) and the logical files involved. Note key fields used, even if they are \
                     generic work fields.",
                    "Summarize the apparent purpose of distinct subroutines (BEGSR/ENDSR blocks).",
                    "Identify parameters received (*ENTRY PLIST).",
                    "Translate the inferred core logic step-by-step into clear, structured, English-like \
                     pseudocode. Use descriptive names in the pseudocode where the purpose of generic RPG \
                     fields can be reasonably inferred. Prioritize clarity and logical flow over exact RPG \
                     syntax representation.",
                    "Note program termination points (RETURN, SETON LR).",
                ]
                .join("\n"),
            ),
        RpgType::Modern => PromptBuilder::new()
            .role(
                "Act as an expert RPG code analyzer specializing in modern, often free-format, RPGLE code. \
                 Analyze the following RPGLE source code, which is assumed to be **hand-coded or modern RPGLE**.",
            )
            .text("**RPG Code:**")
            .code("rpgle", source)
            .section(
                "Instructions:",
                [
                    "Analyze the code assuming standard modern RPGLE practices (meaningful variable names, \
                     procedures, Built-in Functions, modern opcodes like FOR/SELECT).",
                    "Identify the main processing flow, including procedure calls and main logic blocks.",
                    "Identify all file I/O operations (CHAIN, READ, READE, READP, WRITE, UPDATE, DELETE, and \
                     embedded SQL) and the files/tables involved. Note key fields used.",
                    "Identify all procedures (Dcl-Proc/End-Proc) and subroutines (BEGSR/ENDSR) and summarize \
                     their purpose based on the code and variable names.",
                    "Identify parameters received (*ENTRY PLIST or Procedure PI/PR definitions).",
                    "Identify usage of common Built-in Functions (%SUBST, %SCAN, %DATE, %DEC, etc.).",
                    "Translate the logic step-by-step into clear, structured, English-like pseudocode. \
                     Preserve meaningful variable/procedure names. Prioritize clarity and logical flow over \
                     exact RPG syntax representation.",
                    "Note program termination points (RETURN, SETON LR).",
                ]
                .join("\n"),
            ),
    };

    builder.section("Output:", PSEUDOCODE_OUTPUT).build()
}

// =============================================================================
// Flow Diagram
// =============================================================================

pub fn flow_diagram(source: &str, pseudocode: &str) -> String {
    PromptBuilder::new()
        .role(
            "Act as a program flow analyzer. Based on the following RPGLE source code and its generated \
             pseudocode, generate a flowchart description using Mermaid syntax (```mermaid graph TD ... ```).",
        )
        .text("**Source Code:**")
        .code("rpgle", source)
        .section("**Pseudocode:**", pseudocode)
        .section(
            "Instructions:",
            [
                "Represent the main execution path, starting from the likely entry point.",
                "Show major decision points (IF/SELECT) with clear branching labels (e.g., |Condition Met|, \
                 |Else|).",
                "Show significant loops (DO/DOW/DOU/FOR) and indicate the looping block.",
                "Represent calls to distinct procedures or subroutines as single process blocks.",
                "Indicate major I/O operations (e.g., \"Read CUSTOMER File\", \"Update ORDERS Table\", \
                 \"Write Report Line\").",
                "Keep the descriptions within the diagram nodes concise. Focus on the overall flow rather \
                 than minute details.",
                "Ensure the diagram has clear start and end points where possible.",
            ]
            .join("\n"),
        )
        .section(
            "Output:",
            "Produce only the Mermaid flowchart syntax enclosed within a single markdown code block \
             (mermaid ... ). Do not include explanations or introductions.",
        )
        .build()
}

// =============================================================================
// Business Document
// =============================================================================

const BUSINESS_DOCUMENT_STRUCTURE: &str = r#"### 1. Program Overview
    - **Program Name and Type**: Identify program name (if derivable) and type (e.g., Batch Program, Interactive, Service Program module - based on structure/comments).
    - **Inferred Business Purpose**: Summarize the likely primary business function in 1-2 paragraphs based *only* on the code's actions (e.g., "Appears to update customer records based on input X", "Seems to generate a report of Y"). Avoid definitive statements unless supported by comments.
    - **System Context**: State that the broader system context cannot be determined from the code alone.
    - **Key Inferred Functions**: Bullet list of main capabilities observed in the code/pseudocode (e.g., "Reads Customer File", "Calculates Discount based on Field Z", "Updates Order Status", "Writes Report Line").

### 2. Business Process Flow (Inferred)
    - **Mermaid Process Diagram**: Create a Mermaid flowchart (`graph TD`) based on the main logical flow observed in the pseudocode. Focus on major steps and decisions.
    - **Potential Process Triggers**: State that triggers are unknown unless indicated by comments or specific parameter names.
    - **Expected Process Outcomes**: Describe the observable outputs based on the code (e.g., "Updates File X", "Generates output to File Y").
    - **Observed Integration Points**: List any external program calls (`CALLP`, etc.) identified in the code. State that the purpose of the integration is inferred.

### 3. Business Rules Inventory (Candidate Rules)
    - Attempt to identify and categorize potential business rules based on conditional logic (IF/SELECT/CASE), validation checks, and calculations found in the code/pseudocode.
    - For each potential rule include:
        - **Rule ID**: Assign a simple ID (e.g., RULE-001).
        * **Description**: Describe the condition or calculation observed (e.g., "If Field A > 100, set Field B to 'X'").
        * **Location**: Note the procedure/subroutine or pseudocode section where it was observed.
        * **Inferred Purpose**: Briefly suggest a possible business reason if obvious (e.g., "Likely validation for order quantity"), otherwise state "Purpose unclear".
    - **Note**: State clearly that this is an inventory of *potential* rules inferred from logic, not a definitive, validated list.

### 4. Data Structures and Business Entities (Observed)
    - Document key data structures (`Dcl-Ds`) and files (`Dcl-F`) identified in the code.
    - For major structures/files:
        * Explain the apparent purpose based on usage (e.g., "DS used for file I/O", "File appears to hold customer data").
        * List important fields identified and their technical types. State that the business significance is inferred from the name/usage.
    - **Note**: State that relationships between entities are inferred based on how data structures/files are used together in the logic.

### 5. Calculation Logic (Observed)
    - Document significant calculations identified in the code/pseudocode.
    - For each calculation:
        * **Description**: Show the formula or operation performed.
        * **Variables Used**: List the RPG variables involved.
        * **Inferred Purpose**: Suggest the likely business purpose (e.g., "Calculates total price", "Determines eligibility flag"), otherwise state "Purpose unclear".

### 6. Error Handling and Business Exceptions (Observed)
    - List sections of code that appear to handle errors (e.g., `MONITOR`/`ON-ERROR`, checking file status codes, specific error subroutines called).
    - Describe the technical error condition being checked (e.g., "File status <> 0 after CHAIN").
    - State that the specific *business* impact or meaning of the error requires external knowledge unless clearly commented.

### 7. Integration Dependencies (Observed)
    - List external programs or procedures called (`CALLP`, `CALLPRC`).
    - State that the exact data exchanged and the business purpose of the integration are inferred based on parameters (if visible) and context, but require external validation.

### 8. Code Comment Integration
    - Where relevant within the sections above, incorporate meaningful code comments found in the original RPG source that explain business intent or logic. Clearly mark them as originating from comments."#;

pub fn business_document(source: &str, pseudocode: &str) -> String {
    PromptBuilder::new()
        .role(
            "Act as an expert business analyst and technical writer tasked with creating a comprehensive \
             business logic document based *primarily* on the provided RPGLE source code and its \
             corresponding generated pseudocode.",
        )
        .text("**Inputs:**\n1. **RPGLE Source Code:**")
        .code("rpgle", source)
        .text("2. **Generated Pseudocode:**")
        .code("", pseudocode)
        .section(
            "**Primary Task:**",
            "Generate a detailed business documentation artifact in Markdown format. Analyze the provided \
             code and pseudocode to infer and describe the business functionality. **Where business \
             context, purpose, or justification is not explicitly clear from the code or comments, state \
             that it is inferred or cannot be determined.** Prioritize reflecting what can be reasonably \
             deduced from the inputs over inventing details.",
        )
        .section(
            "**Output Structure (Use this Markdown structure):**\n",
            BUSINESS_DOCUMENT_STRUCTURE,
        )
        .numbered_section(
            "**Special Instructions:**\n",
            [
                "**Foundation:** Base all descriptions *primarily* on the provided RPG code and pseudocode.",
                "**Inference vs. Fact:** Clearly distinguish between what is directly observed in the \
                 code/comments and what is inferred about the business purpose or context. Use cautious \
                 language (e.g., \"appears to\", \"likely\", \"suggests\", \"inferred\").",
                "**No Fabrication:** Do not invent business details, justifications, glossaries, or context \
                 not supported by the input code or pseudocode. If information is missing, state that it \
                 cannot be determined from the provided inputs.",
                "**Mermaid Diagrams**: Generate Mermaid syntax only for the \"Business Process Flowchart\" \
                 based on the pseudocode.",
                "**Focus:** Prioritize accurately reflecting the *observable logic* and *potential* business \
                 mapping over creating a document that looks complete but contains unsubstantiated claims.",
            ],
        )
        .section(
            "**Output Format:**",
            "Produce only the Markdown formatted document adhering to the structure above.",
        )
        .build()
}

// =============================================================================
// Target Structure
// =============================================================================

/// Keyword table checked in order; the first hit wins.
const FUNCTION_KEYWORDS: &[(&str, &str)] = &[
    ("customer", "processing customer data"),
    ("order", "processing order data"),
    ("product", "processing product data"),
    ("report", "generating a report"),
    ("inventory", "managing inventory"),
    ("invoice", "processing invoices"),
];

/// Guess the program's primary function from its pseudocode.
pub fn inferred_function(pseudocode: &str) -> &'static str {
    let lower = pseudocode.to_lowercase();
    FUNCTION_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, function)| *function)
        .unwrap_or("processing data")
}

pub fn structure(target: TargetLanguage, pseudocode: &str) -> String {
    let function = inferred_function(pseudocode);
    match target {
        TargetLanguage::Java => PromptBuilder::new()
            .role(format!(
                "Act as a Java Spring Boot architect. Design a complete Spring Boot project structure for a \
                 microservice intended to replace the functionality of an RPG program. Assume the RPG \
                 program's primary function involves {function}."
            ))
            .numbered_section(
                "**Requirements:**",
                [
                    "Target: Java 11 with Spring Boot framework, using Maven.",
                    "Create a standard package structure (e.g., `com.company.modernizedapp.[programname]` with \
                     sub-packages `controller`, `service`, `repository`, `dto`, `model`).",
                    "Define a main Application class with @SpringBootApplication annotation.",
                    "Define a complete REST Controller class (`[ProgramName]Controller.java`) with at least 2 \
                     `@PostMapping` or `@GetMapping` endpoints relevant to the inferred function.",
                    "Define a Service layer interface and implementation (`[ProgramName]Service.java`, \
                     `[ProgramName]ServiceImpl.java`) to contain the core business logic. Include complete \
                     method signatures relevant to the function.",
                    "Define at least 2 Repository interfaces using Spring Data JPA for major files/tables \
                     likely involved.",
                    "Create 2-3 basic DTO classes for API data transfer, with appropriate fields.",
                    "Define 2-3 Model/Entity classes with JPA annotations.",
                    "Provide a complete `pom.xml` including all necessary dependencies.",
                    "Be absolutely certain to include a main Application class and working pom.xml file.",
                ],
            )
            .text(
                "**Important: For each file you generate, add a comment at the top indicating which file it \
                 is and where it should be placed in the package structure.**",
            )
            .section(
                "**Output:**",
                "Provide the complete code for ALL files mentioned above, with clear file names and package \
                 locations. Provide implementation for all methods, not just signatures. I MUST see at \
                 minimum: Application.java, Controller, Service, ServiceImpl, Repositories, Entities/Models, \
                 DTOs, and pom.xml. Enclose each code snippet in a markdown code block with a clear comment \
                 indicating the file name and location.",
            )
            .build(),
        TargetLanguage::Python => PromptBuilder::new()
            .role(format!(
                "Act as a Python application designer. Design a basic Python application structure to \
                 replace the functionality of an RPG program. Assume the RPG program's primary function \
                 involves {function}."
            ))
            .numbered_section(
                "**Requirements:**",
                [
                    "Target: Python 3.x. Use standard libraries where possible.",
                    "Propose a simple file structure (e.g., `main.py`, `logic_module.py`, `data_access.py`, \
                     `models.py`).",
                    "In `main.py`, include basic argument parsing (`argparse`) to accept input parameters (if \
                     applicable) and a main execution block that calls the core logic function.",
                    "In `logic_module.py`, define a primary function (e.g., `process_customer_update`, \
                     `generate_product_report`) that will contain the translated RPG logic. Include \
                     placeholder helper functions for potential subroutines.",
                    "In `data_access.py`, define placeholder functions for interacting with data sources \
                     (e.g., `get_customer_record`, `update_order_status`). Assume database connection/file \
                     handling details are managed elsewhere.",
                    "In `models.py`, define simple Python classes or dataclasses to represent key data \
                     structures or entities involved.",
                    "Include basic docstrings for proposed files and functions.",
                ],
            )
            .section(
                "**Output:**",
                "Provide a description of the proposed file structure followed by skeleton code snippets for \
                 `main.py`, `logic_module.py`, `data_access.py`, and `models.py`. Use placeholders like \
                 `# TODO: Implement logic` or `pass` where appropriate. Enclose code snippets in markdown \
                 code blocks.",
            )
            .build(),
    }
}

// =============================================================================
// Target Logic
// =============================================================================

/// Short list of the skeleton files the logic prompt should target.
///
/// Java needs both a service implementation and a controller, Python needs
/// both the logic and data access modules; otherwise the list is empty.
pub fn structure_info<'a, I>(target: TargetLanguage, paths: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = paths
        .into_iter()
        .map(|p| p.rsplit(['/', '\\']).next().unwrap_or(p))
        .collect();

    match target {
        TargetLanguage::Java => {
            let service_impl = names.iter().find(|n| n.contains("ServiceImpl.java"));
            let controller = names.iter().find(|n| n.contains("Controller.java"));
            let repositories: Vec<&str> = names
                .iter()
                .copied()
                .filter(|n| n.contains("Repository.java"))
                .collect();
            match (service_impl, controller) {
                (Some(service_impl), Some(controller)) => {
                    format!("{}, {}, {}", service_impl, controller, repositories.join(", "))
                }
                _ => String::new(),
            }
        }
        TargetLanguage::Python => {
            let has = |file: &str| names.iter().any(|n| n.contains(file));
            if has("logic_module.py") && has("data_access.py") {
                "logic_module.py, data_access.py".to_string()
            } else {
                String::new()
            }
        }
    }
}

pub fn logic(target: TargetLanguage, pseudocode: &str, structure_info: &str) -> String {
    match target {
        TargetLanguage::Java => PromptBuilder::new()
            .role(
                "Act as an expert Java developer. Translate the core logic from the provided pseudocode into \
                 Java methods within the provided Spring Boot service structure.",
            )
            .text("**Inputs:**\n1. **Pseudocode:**")
            .code("", pseudocode)
            .text(format!("2. **Target Spring Boot Structure:** {structure_info}"))
            .numbered_section(
                "**Instructions:**",
                [
                    "Implement the core business logic described in the pseudocode primarily within the \
                     designated Service implementation class (`[ProgramName]ServiceImpl.java`), filling in \
                     the placeholder methods.",
                    "Use the provided Repository interfaces (e.g., `customerRepository.findById()`, \
                     `productRepository.save()`) for simulated database interactions corresponding to file \
                     I/O in the pseudocode. Assume basic Spring Data JPA method availability.",
                    "Translate pseudocode steps (assignments, calculations, conditions, loops) into idiomatic \
                     Java code.",
                    "Map pseudocode conditional logic (IF/ELSE) to Java `if/else` statements.",
                    "Map pseudocode loops to Java `for` or `while` loops.",
                    "Represent RPG subroutines (if clearly delineated in pseudocode) as private helper \
                     methods in the Service class.",
                    "Use DTOs for input/output where appropriate, mapping fields as suggested by the \
                     pseudocode. Assume Model/Entity classes exist for repository interactions.",
                    "Focus on translating the *logical flow* from the pseudocode. Add basic `// TODO:` \
                     comments for complex calculations or areas needing specific business rules not fully \
                     captured in pseudocode. Implement basic null checks or exception handling (e.g., simple \
                     try-catch blocks around repository calls).",
                    "Use standard Java practices and naming conventions.",
                ],
            )
            .section(
                "**Output:**",
                "Provide the Java code for the implemented methods within the Service implementation class \
                 (`[ProgramName]ServiceImpl.java`). Enclose code snippets in markdown code blocks. Only \
                 provide the method implementations, assuming the class structure already exists.",
            )
            .build(),
        TargetLanguage::Python => PromptBuilder::new()
            .role(
                "Act as an expert Python developer. Translate the core logic from the provided pseudocode \
                 into Python functions within the provided Python application structure.",
            )
            .text("**Inputs:**\n1. **Pseudocode:**")
            .code("", pseudocode)
            .text(format!("2. **Target Python Structure:** {structure_info}"))
            .numbered_section(
                "**Instructions:**",
                [
                    "Implement the core business logic described in the pseudocode primarily within the \
                     designated main logic function (e.g., `process_customer_update()` in \
                     `logic_module.py`), filling in the placeholder.",
                    "Use the placeholder functions from the data access module (e.g., \
                     `data_access.get_customer_record()`, `data_access.update_order_status()`) for \
                     simulated data interactions corresponding to file I/O in the pseudocode.",
                    "Translate pseudocode steps (assignments, calculations, conditions, loops) into idiomatic \
                     Python code.",
                    "Map pseudocode conditional logic (IF/ELSE) to Python `if/elif/else` statements.",
                    "Map pseudocode loops to Python `for` or `while` loops.",
                    "Represent RPG subroutines (if clearly delineated in pseudocode) as helper functions \
                     within `logic_module.py` or a separate utility module.",
                    "Use Python dictionaries, lists, or the defined model classes (`models.py`) for data \
                     representation as suggested by the pseudocode.",
                    "Focus on translating the *logical flow* from the pseudocode. Add basic `# TODO:` \
                     comments for complex calculations or areas needing specific business rules not fully \
                     captured in pseudocode. Implement basic exception handling (e.g., simple try-except \
                     blocks around data access calls).",
                    "Use standard Python practices (PEP 8) and naming conventions.",
                ],
            )
            .section(
                "**Output:**",
                "Provide the Python code for the implemented functions within the relevant modules \
                 (primarily `logic_module.py`). Enclose code snippets in markdown code blocks. Only provide \
                 the function implementations, assuming the basic file/module structure already exists.",
            )
            .build(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudocode_variants_embed_source() {
        let synon = pseudocode(RpgType::Synon, "C     EXSR      ZZINIT");
        let modern = pseudocode(RpgType::Modern, "dcl-proc main;");

        assert!(synon.contains("**was generated by Synon**"));
        assert!(synon.contains("```rpgle\nC     EXSR      ZZINIT\n```"));
        assert!(synon.contains("*ENTRY PLIST"));
        assert!(modern.contains("hand-coded or modern RPGLE"));
        assert!(modern.contains("Dcl-Proc/End-Proc"));
        assert!(modern.ends_with(PSEUDOCODE_OUTPUT));
    }

    #[test]
    fn test_inferred_function_first_keyword_wins() {
        assert_eq!(
            inferred_function("READ ORDERS then update CUSTOMER"),
            "processing customer data"
        );
        assert_eq!(inferred_function("print the REPORT"), "generating a report");
        assert_eq!(inferred_function("x = y + 1"), "processing data");
    }

    #[test]
    fn test_structure_prompt_uses_inferred_function() {
        let java = structure(TargetLanguage::Java, "Loop over inventory records");
        assert!(java.contains("involves managing inventory."));
        assert!(java.contains("pom.xml"));

        let python = structure(TargetLanguage::Python, "nothing special");
        assert!(python.contains("involves processing data."));
        assert!(python.contains("`logic_module.py`"));
    }

    #[test]
    fn test_structure_info_java() {
        let paths = [
            "out/src/main/java/com/acme/service/OrderServiceImpl.java",
            "out/src/main/java/com/acme/controller/OrderController.java",
            "out/src/main/java/com/acme/repository/OrderRepository.java",
            "out/pom.xml",
        ];
        assert_eq!(
            structure_info(TargetLanguage::Java, paths),
            "OrderServiceImpl.java, OrderController.java, OrderRepository.java"
        );
        assert_eq!(structure_info(TargetLanguage::Java, ["out/pom.xml"]), "");
    }

    #[test]
    fn test_structure_info_python() {
        assert_eq!(
            structure_info(TargetLanguage::Python, ["o/logic_module.py", "o/data_access.py"]),
            "logic_module.py, data_access.py"
        );
        assert_eq!(structure_info(TargetLanguage::Python, ["o/main.py"]), "");
    }

    #[test]
    fn test_business_document_sections() {
        let prompt = business_document("src", "pseudo");
        for heading in [
            "### 1. Program Overview",
            "### 3. Business Rules Inventory (Candidate Rules)",
            "### 8. Code Comment Integration",
        ] {
            assert!(prompt.contains(heading), "missing {heading}");
        }
        assert!(prompt.contains("3. **No Fabrication:**"));
    }
}
