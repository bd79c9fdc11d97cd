//! ATS evaluation prompts in English and French

use crate::config::Language;
use log::debug;
use serde::{Deserialize, Serialize};

/// Prompt templates, one per report language
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub english: String,
    pub french: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            english: ATS_EVALUATION_EN.to_string(),
            french: ATS_EVALUATION_FR.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub resume_content: String,
    pub job_content: String,
}

impl PromptTemplates {
    pub fn template(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::French => &self.french,
        }
    }

    /// Fill the template for `language` with the resume and the job description
    pub fn render(&self, language: Language, params: &PromptParams) -> String {
        // Single pass so placeholder-looking text inside the resume stays untouched
        let template = self.template(language);
        let mut prompt = String::with_capacity(
            template.len() + params.resume_content.len() + params.job_content.len(),
        );
        let mut rest = template;

        while let Some(start) = rest.find('{') {
            prompt.push_str(&rest[..start]);
            let tail = &rest[start..];
            if let Some(after) = tail.strip_prefix("{text}") {
                prompt.push_str(&params.resume_content);
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{jd}") {
                prompt.push_str(&params.job_content);
                rest = after;
            } else {
                prompt.push('{');
                rest = &tail[1..];
            }
        }
        prompt.push_str(rest);

        debug!(
            "Rendered {} evaluation prompt: {} characters",
            language.code(),
            prompt.len()
        );
        prompt
    }
}

const ATS_EVALUATION_EN: &str = r#"
Hey Act Like a skilled or very experienced ATS (Application Tracking System)
with a deep understanding of tech field, software engineering, data science, data analyst
and big data engineer. Your task is to evaluate the resume based on the given job description.
You must consider the job market is very competitive and you should provide
the best assistance for improving resumes. Assign the percentage Matching based
on the JD and the missing keywords with high accuracy.
resume: {text}
description: {jd}

I want the response in one single string having the structure:
{"JD Match": "%", "MissingKeywords": [], "Profile Summary": ""}
"#;

const ATS_EVALUATION_FR: &str = r#"
Bonjour, agissez comme un ATS (Système de Suivi des Candidatures) très expérimenté et
ayant une compréhension approfondie du domaine de la technologie, de l'ingénierie logicielle,
de la science des données, de l'analyse de données et de l'ingénierie big data. Votre tâche
consiste à évaluer le CV en fonction de la description de poste fournie. Vous devez tenir
compte du fait que le marché de l'emploi est très compétitif et fournir la meilleure assistance
possible pour améliorer les CV. Attribuez un pourcentage de correspondance basé
sur la description de poste (JD) et les mots-clés manquants avec une grande précision.
CV : {text}
Description du poste : {jd}

Je veux que la réponse soit sous forme d'une seule chaîne de caractères avec la structure suivante :
{"Correspondance JD": "%", "MotsClésManquants": [], "RésuméProfil": ""}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> PromptParams {
        PromptParams {
            resume_content: "Software Engineer with Python experience at Tech Corp.".to_string(),
            job_content: "Senior Software Engineer role requiring React and Python.".to_string(),
        }
    }

    #[test]
    fn test_english_rendering() {
        let prompt = PromptTemplates::default().render(Language::English, &params());

        assert!(prompt.contains("resume: Software Engineer with Python experience at Tech Corp."));
        assert!(prompt.contains("description: Senior Software Engineer role requiring React and Python."));
        assert!(prompt.contains(r#"{"JD Match": "%", "MissingKeywords": [], "Profile Summary": ""}"#));
        assert!(!prompt.contains("{text}"));
        assert!(!prompt.contains("{jd}"));
    }

    #[test]
    fn test_french_rendering() {
        let prompt = PromptTemplates::default().render(Language::French, &params());

        assert!(prompt.contains("CV : Software Engineer"));
        assert!(prompt.contains("Description du poste : Senior Software Engineer"));
        assert!(prompt.contains("\"MotsClésManquants\""));
    }

    #[test]
    fn test_placeholders_in_content_are_not_expanded() {
        let params = PromptParams {
            resume_content: "I type {jd} literally".to_string(),
            job_content: "JOB".to_string(),
        };
        let prompt = PromptTemplates::default().render(Language::English, &params);

        assert!(prompt.contains("resume: I type {jd} literally"));
        assert!(prompt.contains("description: JOB"));
    }
}
