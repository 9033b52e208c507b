pub const ANALYSIS_USER_PROMPT: &str =
    "Проанализируй график и объёмы, выдели все паттерны и дай прогноз.";

pub const CONTINUATION_SYSTEM_PROMPT: &str = "Ты — эксперт по техническому анализу и визуализации графиков. \
На основе данного графика построй прогноз: покажи, куда, вероятно, пойдёт цена, \
нарисуй стрелки направления, обозначь уровни поддержки и сопротивления. \
Сохрани стиль графика, не изменяй прошлые данные.";

pub const CONTINUATION_USER_PROMPT: &str =
    "Продолжи график на несколько свечей вперёд с указанием направлений.";

pub const ASSISTANT_SYSTEM_PROMPT: &str = "Ты помощник ZeroService.";
pub const ASSISTANT_NAME: &str = "ZeroService";

pub fn analysis_system_prompt(pattern_summary: &str) -> String {
    format!(
        "Ты эксперт по техническому анализу. \
Перед тобой два изображения: первое — график цены, второе — объёмы. \
Ты должен рассматривать их совместно.\n\n\
Вот список известных паттернов:\n\
{}\n\n\
1️⃣ Определи все паттерны на графике и отметь их как %%имя%%. \
Если паттерна нет в списке, отметь его как %%имя(новый)%%.\n\
2️⃣ Затем оцени направление будущего движения графика: \
**Вверх**, **Вниз** или **Боковое движение (флэт)**.\n\
3️⃣ Укажи это направление отдельной строкой, в формате:\n\
**Прогноз: Вверх** (или **Вниз**, или **Горизонтально**).",
        pattern_summary
    )
}

pub fn forecast_image_prompt(forecast_text: &str) -> String {
    format!(
        "Создай изображение прогноза движения цены на основе следующего описания:\n\n\
{}\n\n\
Покажи уровни поддержки, сопротивления, стрелки направления (вверх/вниз/флэт). \
Используй стиль свечного графика, нейтральные цвета.",
        forecast_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_embeds_catalog_and_markers() {
        let prompt = analysis_system_prompt("- Флаг: Продолжение");
        assert!(prompt.contains("- Флаг: Продолжение"));
        assert!(prompt.contains("%%имя%%"));
        assert!(prompt.contains("**Прогноз: Вверх**"));
    }

    #[test]
    fn image_prompt_includes_forecast() {
        let prompt = forecast_image_prompt("Рост к 120");
        assert!(prompt.contains("\n\nРост к 120\n\n"));
    }
}
