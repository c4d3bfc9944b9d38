use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::quiz_engine::{
    error::PipelineError,
    models::{GenerationContext, GenerationResult, QuizType},
    stages::{FormattingStep, PipelineStage, ValidationStep},
    strategies::{
        ConceptConnectionStrategy, NumberSequenceStrategy, QuizStrategy, RhymeTimeStrategy, StrategyDeps,
        WordleStrategy,
    },
};

/// Stage chain plus the quiz-type -> strategy registry.
pub struct GenerationPipeline {
    stages: Vec<Box<dyn PipelineStage>>,
    strategies: HashMap<QuizType, Arc<dyn QuizStrategy>>,
}

impl GenerationPipeline {
    /// Validation and formatting stages, one strategy per quiz type.
    pub fn new(deps: StrategyDeps) -> Self {
        let stages: Vec<Box<dyn PipelineStage>> = vec![
            Box::new(ValidationStep::new(deps.languages.clone())),
            Box::new(FormattingStep::new(deps.languages.clone())),
        ];
        let strategies: [Arc<dyn QuizStrategy>; 4] = [
            Arc::new(WordleStrategy::new(deps.clone())),
            Arc::new(NumberSequenceStrategy::new(deps.clone())),
            Arc::new(RhymeTimeStrategy::new(deps.clone())),
            Arc::new(ConceptConnectionStrategy::new(deps)),
        ];
        Self {
            stages,
            strategies: strategies.into_iter().map(|s| (s.quiz_type(), s)).collect(),
        }
    }

    /// Replace (or add) the strategy for its own quiz type.
    pub fn with_strategy(mut self, strategy: Arc<dyn QuizStrategy>) -> Self {
        self.strategies.insert(strategy.quiz_type(), strategy);
        self
    }

    pub fn without_strategy(mut self, quiz_type: QuizType) -> Self {
        self.strategies.remove(&quiz_type);
        self
    }

    pub fn strategy(&self, quiz_type: QuizType) -> Option<Arc<dyn QuizStrategy>> {
        self.strategies.get(&quiz_type).cloned()
    }

    fn run_stages(&self, ctx: &GenerationContext) -> Result<GenerationContext, PipelineError> {
        let mut current = ctx.clone();
        for stage in &self.stages {
            debug!(stage = stage.name(), quiz_type = %current.quiz_type, "entering stage");
            current = stage.apply(&current)?;
        }
        Ok(current)
    }

    /// Run the stage chain only: the validated, normalized context.
    pub async fn execute(&self, ctx: &GenerationContext) -> Result<GenerationContext, PipelineError> {
        self.run_stages(ctx)
    }

    /// Stages, then the strategy for `ctx.quiz_type`. Generation failures come
    /// back as `Ok` results with `error` set; only stage failures and missing
    /// strategies are `Err`.
    pub async fn process(&self, ctx: &GenerationContext) -> Result<GenerationResult, PipelineError> {
        let prepared = self.run_stages(ctx)?;
        let strategy = self
            .strategy(prepared.quiz_type)
            .ok_or_else(|| PipelineError::UnknownQuizType(prepared.quiz_type.to_string()))?;
        debug!(quiz_type = %prepared.quiz_type, language = %prepared.language, "dispatching to strategy");
        Ok(strategy.generate_content(&prepared).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_quiz_type_has_a_strategy() {
        let pipeline = GenerationPipeline::new(StrategyDeps::offline());
        for quiz_type in QuizType::ALL {
            let strategy = pipeline.strategy(quiz_type).unwrap();
            assert_eq!(strategy.quiz_type(), quiz_type);
        }
    }

    #[tokio::test]
    async fn missing_strategy_is_unknown_quiz_type() {
        let pipeline = GenerationPipeline::new(StrategyDeps::offline()).without_strategy(QuizType::RhymeTime);
        let ctx = GenerationContext::new(QuizType::RhymeTime, "en").with_content("cat-hat");
        let err = pipeline.process(&ctx).await.unwrap_err();
        assert!(matches!(err, PipelineError::UnknownQuizType(name) if name == "RHYME_TIME"));
        // Stages still run without a strategy.
        assert_eq!(pipeline.execute(&ctx).await.unwrap().content, "CAT-HAT");
    }

    #[tokio::test]
    async fn stage_errors_stop_before_dispatch() {
        let pipeline = GenerationPipeline::new(StrategyDeps::offline());
        let ctx = GenerationContext::new(QuizType::Wordle, "tlh");
        assert!(matches!(
            pipeline.process(&ctx).await,
            Err(PipelineError::UnsupportedLanguage(_))
        ));
    }
}
