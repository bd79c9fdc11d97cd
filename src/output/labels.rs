//! Report labels in English and French

use crate::config::Language;

/// Every user-facing string of a rendered report
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub generated: &'static str,
    pub match_score: &'static str,
    pub method: &'static str,
    pub matched_keywords: &'static str,
    pub missing_keywords: &'static str,
    pub mistakes_heading: &'static str,
    pub error: &'static str,
    pub message: &'static str,
    pub suggestions: &'static str,
    pub context: &'static str,
    pub no_mistakes: &'static str,
    pub evaluation_heading: &'static str,
    pub evaluation_unavailable: &'static str,
    pub similarity_unavailable: &'static str,
    pub warnings: &'static str,
    pub processing: &'static str,
}

const ENGLISH: Labels = Labels {
    title: "Smart ATS with Mistake Analysis",
    subtitle: "Improve your resume for ATS and fix mistakes",
    generated: "Generated",
    match_score: "Match Score",
    method: "Method",
    matched_keywords: "Matched keywords",
    missing_keywords: "Missing keywords",
    mistakes_heading: "Text Mistakes Analysis",
    error: "Error",
    message: "Message",
    suggestions: "Suggestions",
    context: "Context",
    no_mistakes: "No grammar or spelling mistakes detected!",
    evaluation_heading: "ATS Evaluation",
    evaluation_unavailable: "Evaluation unavailable",
    similarity_unavailable: "Match score unavailable",
    warnings: "Warnings",
    processing: "Processing resume...",
};

const FRENCH: Labels = Labels {
    title: "Smart ATS avec Analyse des Fautes",
    subtitle: "Améliorez votre CV pour l'ATS et corrigez les fautes",
    generated: "Généré",
    match_score: "Score de correspondance",
    method: "Méthode",
    matched_keywords: "Mots-clés trouvés",
    missing_keywords: "Mots-clés manquants",
    mistakes_heading: "Analyse des fautes de texte",
    error: "Erreur",
    message: "Message",
    suggestions: "Suggestions",
    context: "Contexte",
    no_mistakes: "Aucune faute détectée !",
    evaluation_heading: "Évaluation ATS",
    evaluation_unavailable: "Évaluation indisponible",
    similarity_unavailable: "Score de correspondance indisponible",
    warnings: "Avertissements",
    processing: "Traitement en cours...",
};

impl Labels {
    pub fn for_language(language: Language) -> &'static Labels {
        match language {
            Language::English => &ENGLISH,
            Language::French => &FRENCH,
        }
    }
}
