// Prompt templates for the two prompt-builder paths.
// Wording is user-facing product copy (Spanish, rioplatense) and is
// embedded verbatim; only the `{placeholder}` tokens are substituted.

/// Sentinel the extraction prompt asks for when job type or location is absent.
pub const NOT_SPECIFIED: &str = "No especificado";

/// Prefix of the default profile name; the chat id is appended.
pub const DEFAULT_NAME_PREFIX: &str = "Usuario_";

/// Profile-extraction prompt.
/// Replace `{chat_id}` first, then `{message_text}`.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"
Un usuario envió el mensaje: "{message_text}"

Extraé los datos y generá un JSON con esta estructura exacta:
{
  "name": "<Nombre o 'Usuario_{chat_id}' si no se proporciona>",
  "email": "<Email o '' si no se proporciona>",
  "skills": ["<habilidad1>", "<habilidad2>", ...],
  "job_type": "<Tipo de trabajo, por ejemplo, 'Full time'>",
  "location": "<Ubicación, por ejemplo, 'Remoto'>"
}

Ejemplo de salida:
{
  "name": "Nico",
  "email": "nico@email.com",
  "skills": ["Fullstack", "C#", ".NET Core", "SQL Server", "SQL", "Entity Framework", "LINQ", "testing"],
  "job_type": "Full time",
  "location": "Remoto"
}

Asegúrate de que:
- El JSON sea válido.
- Las habilidades sean un array de strings.
- Usa valores por defecto si faltan datos (email: '', job_type: 'No especificado', location: 'No especificado').
- La salida esté envuelta en ```json
 y 
```.
"#;

/// Instruction block of the notification prompt, everything before the listings.
pub const NOTIFICATION_INSTRUCTIONS: &str = r#"Sos un asistente de oportunidades laborales.

A continuación, te paso una lista de empleos que matchean con el perfil de un usuario. Estos trabajos fueron seleccionados automáticamente por un sistema de matching basado en habilidades, requisitos y puntuación de similitud.

Tu tarea es:
1. Leer todas las ofertas.
2. Seleccionar las más destacadas (hasta 3 o 4 si hay muchas).
3. Escribir un mensaje personalizado para el usuario como si se lo enviaras por Telegram.
4. El mensaje debe ser cálido, claro y directo, por ejemplo: "¡Hola! Estas son algunas oportunidades ideales para vos...".

No devuelvas JSON ni Markdown. Respondé solo con el texto final del mensaje."#;

/// Notification-composition prompt.
/// Replace `{instructions}` with [`NOTIFICATION_INSTRUCTIONS`], then `{listings_json}`.
pub const NOTIFICATION_PROMPT_TEMPLATE: &str = r#"
{instructions}

---
Ofertas de trabajo:
{listings_json}
---
"#;

/// Placeholder for listing fields the offer text does not mention.
pub const LISTING_NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a listing without a stated salary.
pub const SALARY_NOT_SPECIFIED: &str = "Not specified";

/// Job-offer extraction prompt (scraped offer text → one listing record).
/// Replace `{job_text}` before sending.
pub const LISTING_EXTRACTION_PROMPT_TEMPLATE: &str = r#"
Eres un asistente experto en extracción de datos y procesamiento de texto para sistemas de inteligencia artificial.

A partir del siguiente texto extraído de una oferta de empleo, extrae la información solicitada en formato JSON válido. Si un campo no está presente, usa "N/A".
IMPORTANTE:
Para el campo "requirements", convierte todos los requisitos o habilidades en etiquetas **cortas**, claras y generalizadas:
- Usá solo **una o dos palabras por habilidad**.
- Eliminar redundancias y descripciones largas.
- Ejemplos:
- "Experiencia en desarrollo backend (2+ años)" → "backend +2 años"
- "Conocimientos sólidos en pruebas unitarias, de integración y end-to-end" → "testing"
- "Capacidad para trabajar en equipo" → "teamwork"
- "Manejo de base de datos relacionales como MySQL o PostgreSQL" → "SQL"
---
Campos a extraer:
- title: Título del puesto
- company: Nombre de la empresa
- description: Descripción general del puesto
- location: Ubicación del empleo (puede incluir "Remoto")
- salary: Salario si está especificado, o "Not specified"
- date_posted: Fecha de publicación
- job_type: Tipo de empleo (ej: Full time, Part time)
- requirements: Lista de habilidades o requisitos clave, expresados como etiquetas cortas (ej. ["Python", "SQL", "testing", "agile"])
---
Texto de la oferta:
{job_text}

Devuelve SOLO un objeto JSON válido, sin comentarios, texto adicional ni formato Markdown.
Ejemplo:
{"title":"Ejemplo","company":"N/A","description":"N/A","location":"N/A","salary":"Not specified","date_posted":"N/A","job_type":"N/A","requirements":["Python", "SQL", "teamwork"]}
"#;
